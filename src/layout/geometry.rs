//! Bounding geometry of resolved elements

use super::config::PageConfig;
use super::error::GeometryError;
use super::types::{BoundingBox, Element, Point};

impl BoundingBox {
    /// Box of a resolved element, in scaled units.
    ///
    /// The element's position is its own anchor point, so the box is shifted
    /// against the anchor vector by half its extents.
    pub fn of_element(element: &Element) -> Result<BoundingBox, GeometryError> {
        if element.position.coordinates().is_none() {
            return Err(GeometryError::NoPosition {
                name: element.name.clone(),
            });
        }
        let Some(size) = element.dimension else {
            return Err(GeometryError::NoDimension {
                name: element.name.clone(),
            });
        };
        let center = element
            .scaled_center()
            .ok_or_else(|| GeometryError::NoPosition {
                name: element.name.clone(),
            })?;
        Ok(BoundingBox::centered(center, size.scaled))
    }

    /// Exit point of a ray cast from the center along `direction`.
    ///
    /// Returns the center itself for a zero direction or a degenerate box.
    pub fn edge_intersection(&self, direction: Point) -> Point {
        let center = self.center();
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;

        // Distance along the ray to each pair of edges; the nearer one wins
        let tx = if direction.x != 0.0 {
            half_w / direction.x.abs()
        } else {
            f64::INFINITY
        };
        let ty = if direction.y != 0.0 {
            half_h / direction.y.abs()
        } else {
            f64::INFINITY
        };
        let t = tx.min(ty);

        if !t.is_finite() || t <= 0.0 {
            return center;
        }
        center.translate(direction.x * t, direction.y * t)
    }

    /// Smallest box around every element that has one.
    ///
    /// Elements without numeric geometry are skipped.
    pub fn aggregate<'a>(
        elements: impl IntoIterator<Item = &'a Element>,
    ) -> Result<BoundingBox, GeometryError> {
        elements
            .into_iter()
            .filter_map(|element| BoundingBox::of_element(element).ok())
            .reduce(|acc, bounds| acc.union(&bounds))
            .ok_or(GeometryError::Empty)
    }

    /// Aggregate box grown by the page margin
    pub fn page<'a>(
        elements: impl IntoIterator<Item = &'a Element>,
        page: &PageConfig,
    ) -> Result<BoundingBox, GeometryError> {
        let bounds = Self::aggregate(elements)?;
        Ok(bounds.expand(
            page.margin.w * page.scale.size.w,
            page.margin.h * page.scale.size.h,
        ))
    }
}
