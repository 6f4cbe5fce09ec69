//! Fixed-point resolution driver
//!
//! Positions may depend on other elements' sizes and sizes on other elements'
//! positions, so elements are resolved in repeated passes. Each pass visits the
//! elements still pending in declaration order; results from earlier elements
//! in the same pass are visible to later ones. A pass that settles nothing, or
//! running out of passes, means the remaining references form a cycle.

use indexmap::IndexMap;
use log::{debug, trace};

use super::config::{ResolveConfig, ScaleConfig};
use super::dimension::{resolve_dimension, DimensionResult};
use super::error::ResolveError;
use super::position::{resolve_position, PositionResult, ResolutionContext};
use super::types::{Element, Point, Position, ResolvedPoint};
use crate::parser::ast::ElementKind;

/// Resolve every element's position and dimension in place
pub fn resolve(
    elements: &mut IndexMap<String, Element>,
    scale: &ScaleConfig,
    config: &ResolveConfig,
) -> Result<(), ResolveError> {
    validate_endpoints(elements)?;

    let mut pending: Vec<String> = elements
        .values()
        .filter(|element| !element.is_resolved())
        .map(|element| element.name.clone())
        .collect();
    let limit = config.pass_limit(elements.len());
    let mut pass = 0;

    while !pending.is_empty() {
        if pass >= limit {
            return Err(ResolveError::cyclic(pending));
        }
        pass += 1;

        let mut progressed = false;
        let mut deferred = Vec::new();
        for name in pending {
            let outcome = {
                let ctx = ResolutionContext::new(elements, scale);
                match elements.get(&name) {
                    Some(element) => Outcome::compute(element, &ctx)?,
                    None => continue,
                }
            };
            if let Some(element) = elements.get_mut(&name) {
                progressed |= outcome.apply(element);
                if !element.is_resolved() {
                    deferred.push(name);
                }
            }
        }

        debug!(pass, deferred = deferred.len(); "resolution pass complete");
        if !deferred.is_empty() && !progressed {
            return Err(ResolveError::cyclic(deferred));
        }
        pending = deferred;
    }

    Ok(())
}

/// Edge endpoints must name declared elements
fn validate_endpoints(elements: &IndexMap<String, Element>) -> Result<(), ResolveError> {
    for element in elements.values() {
        let endpoints = [("from", &element.from), ("to", &element.to)];
        for (field, endpoint) in endpoints {
            if let Some(reference) = endpoint {
                if !elements.contains_key(&reference.element) {
                    return Err(ResolveError::not_found(
                        &reference.element,
                        &element.name,
                        field,
                    ));
                }
            }
        }
    }
    Ok(())
}

/// Results of one attempt at an element
struct Outcome {
    dimension: Option<DimensionResult>,
    position: Option<PositionResult>,
}

impl Outcome {
    fn compute(element: &Element, ctx: &ResolutionContext<'_>) -> Result<Self, ResolveError> {
        let dimension = match element.dimension {
            Some(_) => None,
            None => match resolve_dimension(element, ctx) {
                DimensionResult::Failure(err) => return Err(err),
                result => Some(result),
            },
        };
        let position = match element.position {
            Position::Unresolved => match resolve_position(element, ctx) {
                PositionResult::Failure(err) => return Err(err),
                result => Some(result),
            },
            _ => None,
        };
        Ok(Self {
            dimension,
            position,
        })
    }

    /// Store settled results; returns whether anything changed
    fn apply(self, element: &mut Element) -> bool {
        let mut changed = false;

        match self.dimension {
            Some(DimensionResult::Coordinates(size)) => {
                element.dimension = Some(size);
                changed = true;
            }
            Some(DimensionResult::Named(reference)) => {
                trace!("dimension of '{}' waits on '{}'", element.name, reference);
            }
            Some(DimensionResult::Failure(_)) | None => {}
        }

        match self.position {
            Some(PositionResult::Coordinates(point)) => {
                element.position = Position::Coordinates(point);
                changed = true;
            }
            Some(PositionResult::Named(named)) if named.deferred => {
                trace!("position of '{}' waits on '{}'", element.name, named.reference);
            }
            Some(PositionResult::Named(named)) => {
                element.position = Position::Symbolic(named.into());
                changed = true;
            }
            Some(PositionResult::NotComputed) => {
                element.position = match element.kind {
                    ElementKind::Node => {
                        debug!("'{}' has no placement, using the origin", element.name);
                        Position::Coordinates(ResolvedPoint {
                            scaled: Point::default(),
                            unscaled: Point::default(),
                        })
                    }
                    ElementKind::Edge => Position::Unplaced,
                };
                changed = true;
            }
            Some(PositionResult::Failure(_)) | None => {}
        }

        changed
    }
}
