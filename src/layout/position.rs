//! Position resolution
//!
//! Computes an element's position from its placement declarations, in
//! precedence order:
//!
//! 1. explicit `x` and `y`
//! 2. a single `position_of` reference plus `adjust_x`/`adjust_y`
//! 3. independent `x_of`/`y_of` references, each with its own literal fallback
//! 4. nothing declared, reported as [`PositionResult::NotComputed`]
//!
//! Offsets are written in unscaled units. They are scaled, added to the scaled
//! reference value, and the unscaled result is derived from that final scaled
//! value.

use indexmap::IndexMap;

use super::anchor::AnchorSpec;
use super::config::ScaleConfig;
use super::error::ResolveError;
use super::types::{
    Axis, AxisSource, DualValue, Element, Point, Position, ResolvedPoint, SplitAxes,
    SymbolicPosition,
};
use crate::parser::ast::Reference;

/// Outcome of resolving one element's position
#[derive(Debug, Clone, PartialEq)]
pub enum PositionResult {
    Coordinates(ResolvedPoint),
    Named(NamedPosition),
    /// No placement attributes; the caller picks a default
    NotComputed,
    Failure(ResolveError),
}

impl PositionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PositionResult::Coordinates(_))
    }

    pub fn failure(&self) -> Option<&ResolveError> {
        match self {
            PositionResult::Failure(err) => Some(err),
            _ => None,
        }
    }

    pub fn coordinates(&self) -> Option<&ResolvedPoint> {
        match self {
            PositionResult::Coordinates(point) => Some(point),
            _ => None,
        }
    }
}

/// A position expressed against a reference the resolver cannot evaluate now
#[derive(Debug, Clone, PartialEq)]
pub struct NamedPosition {
    /// Raw `name` or `name.anchor` reference
    pub reference: String,
    /// Pending offsets, unscaled
    pub offset: Point,
    /// `true` when the reference may become numeric on a later pass;
    /// `false` for anchors only the backend can evaluate
    pub deferred: bool,
    /// Per-axis sources when `x_of`/`y_of` leave at least one axis symbolic
    pub axes: Option<SplitAxes>,
}

impl From<NamedPosition> for SymbolicPosition {
    fn from(named: NamedPosition) -> Self {
        SymbolicPosition {
            reference: named.reference,
            offset: named.offset,
            axes: named.axes,
        }
    }
}

/// How far a reference can be evaluated right now
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Reach {
    /// Scaled coordinates of the referenced point
    Point(Point),
    Deferred,
    Symbolic,
}

/// Read access to the elements registered for this pass
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    elements: &'a IndexMap<String, Element>,
    scale: &'a ScaleConfig,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(elements: &'a IndexMap<String, Element>, scale: &'a ScaleConfig) -> Self {
        Self { elements, scale }
    }

    pub fn scale(&self) -> &'a ScaleConfig {
        self.scale
    }

    /// Look up the element a reference points at
    pub fn element(
        &self,
        reference: &Reference,
        referrer: &str,
        field: &'static str,
    ) -> Result<&'a Element, ResolveError> {
        self.elements
            .get(&reference.element)
            .ok_or_else(|| ResolveError::not_found(&reference.element, referrer, field))
    }

    /// Evaluate a reference to scaled coordinates if its dependencies allow
    pub(crate) fn reach(
        &self,
        reference: &Reference,
        referrer: &str,
        field: &'static str,
    ) -> Result<Reach, ResolveError> {
        let target = self.element(reference, referrer, field)?;

        if matches!(reference.anchor, Some(AnchorSpec::Native(_))) {
            return Ok(Reach::Symbolic);
        }

        let point = match &target.position {
            Position::Unresolved => return Ok(Reach::Deferred),
            Position::Unplaced => {
                return Err(ResolveError::Unplaced {
                    name: target.name.clone(),
                    referrer: referrer.to_string(),
                    field,
                })
            }
            Position::Symbolic(_) => return Ok(Reach::Symbolic),
            Position::Coordinates(point) => point,
        };

        match &reference.anchor {
            None => Ok(Reach::Point(point.scaled)),
            Some(AnchorSpec::Geometric(anchor)) => {
                match (target.scaled_center(), target.dimension) {
                    (Some(center), Some(size)) => {
                        let offset = anchor.offset(size.scaled);
                        Ok(Reach::Point(center.translate(offset.x, offset.y)))
                    }
                    _ => Ok(Reach::Deferred),
                }
            }
            Some(AnchorSpec::Native(_)) => Ok(Reach::Symbolic),
        }
    }
}

/// Resolve the position of `element` against the registered elements
pub fn resolve_position(element: &Element, ctx: &ResolutionContext<'_>) -> PositionResult {
    match try_resolve_position(element, ctx) {
        Ok(result) => result,
        Err(err) => PositionResult::Failure(err),
    }
}

fn try_resolve_position(
    element: &Element,
    ctx: &ResolutionContext<'_>,
) -> Result<PositionResult, ResolveError> {
    let placement = &element.placement;
    let scale = &ctx.scale().position;
    let offset = Point::new(placement.adjust_x, placement.adjust_y);

    if let (Some(x), Some(y)) = (placement.x, placement.y) {
        return Ok(literal(Point::new(x, y), offset, ctx));
    }

    if let Some(reference) = &placement.position_of {
        let result = match ctx.reach(reference, &element.name, "position_of")? {
            Reach::Point(point) => PositionResult::Coordinates(ResolvedPoint::from_axes(
                DualValue::from_scaled(point.x + offset.x * scale.x, scale.x),
                DualValue::from_scaled(point.y + offset.y * scale.y, scale.y),
            )),
            Reach::Deferred => named(reference, offset, true),
            Reach::Symbolic => named(reference, offset, false),
        };
        return Ok(result);
    }

    if placement.x_of.is_some() || placement.y_of.is_some() {
        let x = axis_value(element, Axis::X, ctx)?;
        let y = axis_value(element, Axis::Y, ctx)?;
        let result = match (x, y) {
            (AxisValue::Value(x), AxisValue::Value(y)) => {
                PositionResult::Coordinates(ResolvedPoint::from_axes(x, y))
            }
            (AxisValue::Deferred(reference), _) | (_, AxisValue::Deferred(reference)) => {
                PositionResult::Named(NamedPosition {
                    reference,
                    offset,
                    deferred: true,
                    axes: None,
                })
            }
            (x, y) => split_symbolic(x.into_source(offset.x), y.into_source(offset.y), offset),
        };
        return Ok(result);
    }

    if placement.x.is_some() || placement.y.is_some() {
        let point = Point::new(placement.x.unwrap_or(0.0), placement.y.unwrap_or(0.0));
        return Ok(literal(point, offset, ctx));
    }

    Ok(PositionResult::NotComputed)
}

fn literal(point: Point, offset: Point, ctx: &ResolutionContext<'_>) -> PositionResult {
    let point = point.translate(offset.x, offset.y);
    PositionResult::Coordinates(ResolvedPoint::from_unscaled(point, &ctx.scale().position))
}

fn named(reference: &Reference, offset: Point, deferred: bool) -> PositionResult {
    PositionResult::Named(NamedPosition {
        reference: reference.to_string(),
        offset,
        deferred,
        axes: None,
    })
}

/// At least one axis is backend-native; keep both axes' sources
fn split_symbolic(x: AxisSource, y: AxisSource, offset: Point) -> PositionResult {
    let reference = [&x, &y]
        .into_iter()
        .find_map(|source| match source {
            AxisSource::Reference { reference, .. } => Some(reference.clone()),
            AxisSource::Value(_) => None,
        })
        .unwrap_or_default();
    PositionResult::Named(NamedPosition {
        reference,
        offset,
        deferred: false,
        axes: Some(SplitAxes { x, y }),
    })
}

enum AxisValue {
    Value(DualValue),
    Deferred(String),
    Symbolic(String),
}

impl AxisValue {
    /// Only called once no axis is deferred
    fn into_source(self, adjust: f64) -> AxisSource {
        match self {
            AxisValue::Value(value) => AxisSource::Value(value),
            AxisValue::Deferred(reference) | AxisValue::Symbolic(reference) => {
                AxisSource::Reference {
                    reference,
                    offset: adjust,
                }
            }
        }
    }
}

fn axis_value(
    element: &Element,
    axis: Axis,
    ctx: &ResolutionContext<'_>,
) -> Result<AxisValue, ResolveError> {
    let placement = &element.placement;
    let factor = ctx.scale().position.factor(axis);
    let adjust = placement.adjust(axis);

    let Some(reference) = placement.axis_reference(axis) else {
        let unscaled = placement.literal(axis).unwrap_or(0.0) + adjust;
        return Ok(AxisValue::Value(DualValue::from_unscaled(unscaled, factor)));
    };

    let field = match axis {
        Axis::X => "x_of",
        Axis::Y => "y_of",
    };
    Ok(match ctx.reach(reference, &element.name, field)? {
        Reach::Point(point) => {
            AxisValue::Value(DualValue::from_scaled(point.get(axis) + adjust * factor, factor))
        }
        Reach::Deferred => AxisValue::Deferred(reference.to_string()),
        Reach::Symbolic => AxisValue::Symbolic(reference.to_string()),
    })
}
