//! Dimension resolution
//!
//! Width and height are resolved independently, each in precedence order:
//! explicit literal, same-axis reference to another element's size, span
//! between two reference points, and finally a default of one unit.

use super::error::ResolveError;
use super::position::{Reach, ResolutionContext};
use super::types::{Axis, DualValue, Element, ResolvedSize};
use crate::parser::ast::{AxisSizing, Reference};

/// Outcome of resolving one element's dimension
#[derive(Debug, Clone, PartialEq)]
pub enum DimensionResult {
    Coordinates(ResolvedSize),
    /// Waiting on the named reference
    Named(String),
    Failure(ResolveError),
}

impl DimensionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, DimensionResult::Coordinates(_))
    }

    pub fn size(&self) -> Option<&ResolvedSize> {
        match self {
            DimensionResult::Coordinates(size) => Some(size),
            _ => None,
        }
    }
}

enum Extent {
    Value(DualValue),
    Deferred(String),
}

/// Resolve the width and height of `element`
pub fn resolve_dimension(element: &Element, ctx: &ResolutionContext<'_>) -> DimensionResult {
    let w = match resolve_extent(element, Axis::X, ctx) {
        Ok(extent) => extent,
        Err(err) => return DimensionResult::Failure(err),
    };
    let h = match resolve_extent(element, Axis::Y, ctx) {
        Ok(extent) => extent,
        Err(err) => return DimensionResult::Failure(err),
    };

    match (w, h) {
        (Extent::Value(w), Extent::Value(h)) => {
            DimensionResult::Coordinates(ResolvedSize::from_axes(w, h))
        }
        (Extent::Deferred(reference), _) | (_, Extent::Deferred(reference)) => {
            DimensionResult::Named(reference)
        }
    }
}

fn resolve_extent(
    element: &Element,
    axis: Axis,
    ctx: &ResolutionContext<'_>,
) -> Result<Extent, ResolveError> {
    let sizing = element.sizing.axis(axis);
    let factor = ctx.scale().size.factor(axis);
    let (of_field, span_axis) = match axis {
        Axis::X => ("w_of", "w"),
        Axis::Y => ("h_of", "h"),
    };

    if let Some(value) = sizing.literal {
        return Ok(Extent::Value(DualValue::from_unscaled(value, factor)));
    }

    if let Some(reference) = sizing.of {
        let target = ctx.element(reference, &element.name, of_field)?;
        return Ok(match target.dimension {
            Some(size) => Extent::Value(DualValue::from_scaled(
                size.scaled.get(axis) + sizing.adjust * factor,
                factor,
            )),
            None => Extent::Deferred(reference.to_string()),
        });
    }

    if sizing.from.is_some() || sizing.to.is_some() {
        return span(element, axis, sizing, span_axis, ctx);
    }

    Ok(Extent::Value(DualValue::from_unscaled(1.0, factor)))
}

fn span(
    element: &Element,
    axis: Axis,
    sizing: AxisSizing<'_>,
    span_axis: &'static str,
    ctx: &ResolutionContext<'_>,
) -> Result<Extent, ResolveError> {
    let (Some(from), Some(to)) = (sizing.from, sizing.to) else {
        return Err(ResolveError::IncompleteSpan {
            element: element.name.clone(),
            axis: span_axis,
        });
    };
    let (from_field, to_field) = match axis {
        Axis::X => ("w_from", "w_to"),
        Axis::Y => ("h_from", "h_to"),
    };

    let start = ctx.reach(from, &element.name, from_field)?;
    let end = ctx.reach(to, &element.name, to_field)?;

    let non_numeric = |reference: &Reference| ResolveError::NonNumericSpan {
        element: element.name.clone(),
        reference: reference.to_string(),
    };
    let start = match start {
        Reach::Point(point) => point,
        Reach::Deferred => return Ok(Extent::Deferred(from.to_string())),
        Reach::Symbolic => return Err(non_numeric(from)),
    };
    let end = match end {
        Reach::Point(point) => point,
        Reach::Deferred => return Ok(Extent::Deferred(to.to_string())),
        Reach::Symbolic => return Err(non_numeric(to)),
    };

    let factor = ctx.scale().size.factor(axis);
    let scaled = (end.get(axis) - start.get(axis)).abs() + sizing.adjust * factor;
    Ok(Extent::Value(DualValue::from_scaled(scaled, factor)))
}
