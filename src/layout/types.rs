//! Core types for the resolver

use std::fmt;

use indexmap::IndexMap;

use super::anchor::AnchorSpec;
use super::config::{PositionScale, SizeScale};
use crate::parser::ast::{ElementDecl, ElementKind, Placement, Reference, Sizing, SubRecord};
use crate::stylesheet::StyleValue;

/// A 2D point. The y axis grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of an element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// Extent along an axis (width for X, height for Y)
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.w,
            Axis::Y => self.h,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

/// A single value in both unit systems
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualValue {
    pub scaled: f64,
    pub unscaled: f64,
}

impl DualValue {
    /// Scale an author-unit value; the scaled side is derived
    pub fn from_unscaled(unscaled: f64, factor: f64) -> Self {
        Self {
            scaled: unscaled * factor,
            unscaled,
        }
    }

    /// Take a rendering-unit value as authoritative; the unscaled side is derived
    pub fn from_scaled(scaled: f64, factor: f64) -> Self {
        Self {
            scaled,
            unscaled: scaled / factor,
        }
    }
}

/// A resolved position in both unit systems
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPoint {
    pub scaled: Point,
    pub unscaled: Point,
}

impl ResolvedPoint {
    pub fn from_axes(x: DualValue, y: DualValue) -> Self {
        Self {
            scaled: Point::new(x.scaled, y.scaled),
            unscaled: Point::new(x.unscaled, y.unscaled),
        }
    }

    pub fn from_unscaled(point: Point, scale: &PositionScale) -> Self {
        Self::from_axes(
            DualValue::from_unscaled(point.x, scale.x),
            DualValue::from_unscaled(point.y, scale.y),
        )
    }

    pub fn from_scaled(point: Point, scale: &PositionScale) -> Self {
        Self::from_axes(
            DualValue::from_scaled(point.x, scale.x),
            DualValue::from_scaled(point.y, scale.y),
        )
    }
}

/// A resolved dimension in both unit systems
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSize {
    pub scaled: Size,
    pub unscaled: Size,
}

impl ResolvedSize {
    pub fn from_axes(w: DualValue, h: DualValue) -> Self {
        Self {
            scaled: Size::new(w.scaled, h.scaled),
            unscaled: Size::new(w.unscaled, h.unscaled),
        }
    }

    pub fn from_unscaled(size: Size, scale: &SizeScale) -> Self {
        Self::from_axes(
            DualValue::from_unscaled(size.w, scale.w),
            DualValue::from_unscaled(size.h, scale.h),
        )
    }
}

/// One axis of a position whose axes come from separate sources
#[derive(Debug, Clone, PartialEq)]
pub enum AxisSource {
    Value(DualValue),
    /// Reference the backend evaluates, plus an unscaled offset
    Reference { reference: String, offset: f64 },
}

impl fmt::Display for AxisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisSource::Value(value) => write!(f, "{}", value.scaled),
            AxisSource::Reference { reference, offset } if *offset == 0.0 => {
                f.write_str(reference)
            }
            AxisSource::Reference { reference, offset } if *offset < 0.0 => {
                write!(f, "{reference} - {}", -offset)
            }
            AxisSource::Reference { reference, offset } => write!(f, "{reference} + {offset}"),
        }
    }
}

/// Per-axis sources of an `x_of`/`y_of` position
#[derive(Debug, Clone, PartialEq)]
pub struct SplitAxes {
    pub x: AxisSource,
    pub y: AxisSource,
}

/// A position the resolver could not compute numerically, handed to the
/// backend as-is (e.g. a backend-native anchor such as `n1.text`).
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicPosition {
    /// Raw `name.anchor` reference; the first symbolic axis for split positions
    pub reference: String,
    /// Offset from the reference, in unscaled units
    pub offset: Point,
    /// Set when x and y follow different sources
    pub axes: Option<SplitAxes>,
}

impl fmt::Display for SymbolicPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(axes) = &self.axes {
            return write!(f, "({}, {})", axes.x, axes.y);
        }
        if self.offset == Point::default() {
            write!(f, "{}", self.reference)
        } else {
            write!(f, "{} + {}", self.reference, self.offset)
        }
    }
}

/// The resolved placement of an element
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Position {
    /// Not resolved yet
    #[default]
    Unresolved,
    /// No placement declared and no default applies (edges)
    Unplaced,
    Coordinates(ResolvedPoint),
    Symbolic(SymbolicPosition),
}

impl Position {
    pub fn coordinates(&self) -> Option<&ResolvedPoint> {
        match self {
            Position::Coordinates(point) => Some(point),
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Position::Unresolved)
    }
}

/// A node or edge going through resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub kind: ElementKind,
    pub placement: Placement,
    pub sizing: Sizing,
    /// The element's own anchor: which point of its box sits at `position`
    pub anchor: AnchorSpec,
    pub style: Option<String>,
    /// Backend option string, applied last during style resolution
    pub attributes: String,
    pub properties: IndexMap<String, StyleValue>,
    pub records: Vec<SubRecord>,
    pub from: Option<Reference>,
    pub to: Option<Reference>,
    pub position: Position,
    pub dimension: Option<ResolvedSize>,
}

impl Element {
    /// An unplaced node with no declarations
    pub fn new(name: impl Into<String>) -> Self {
        Self::from(ElementDecl::new(name))
    }

    /// True once both position and dimension are settled
    pub fn is_resolved(&self) -> bool {
        !self.position.is_unresolved() && self.dimension.is_some()
    }

    /// Geometric center in scaled units, when position and size are numeric.
    ///
    /// The position is the element's own anchor point, so the center sits
    /// half an extent away along the reversed anchor vector.
    pub fn scaled_center(&self) -> Option<Point> {
        let point = self.position.coordinates()?;
        let size = self.dimension?;
        let v = self.anchor.vector();
        Some(point.scaled.translate(
            -v.x * size.scaled.w / 2.0,
            -v.y * size.scaled.h / 2.0,
        ))
    }
}

impl From<ElementDecl> for Element {
    fn from(decl: ElementDecl) -> Self {
        let placement = Placement::from_decl(&decl);
        let sizing = Sizing::from_decl(&decl);
        Self {
            anchor: decl
                .anchor
                .as_deref()
                .map(AnchorSpec::parse)
                .unwrap_or_default(),
            kind: decl.kind.unwrap_or_default(),
            from: decl.from.as_deref().map(Reference::parse),
            to: decl.to.as_deref().map(Reference::parse),
            name: decl.name,
            placement,
            sizing,
            style: decl.style,
            attributes: decl.attributes.unwrap_or_default(),
            properties: decl.properties,
            records: decl.records,
            position: Position::Unresolved,
            dimension: None,
        }
    }
}

/// An axis-aligned box. `(x, y)` is the lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box of `size` centered on `center`
    pub fn centered(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.w / 2.0,
            center.y - size.h / 2.0,
            size.w,
            size.h,
        )
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Point containment, edges included
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.bottom()
            && point.y <= self.top()
    }

    /// Overlap test, touching edges count as overlapping
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        !(self.right() < other.left()
            || other.right() < self.left()
            || self.top() < other.bottom()
            || other.top() < self.bottom())
    }

    /// Smallest box containing both
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let top = self.top().max(other.top());
        BoundingBox::new(x, y, right - x, top - y)
    }

    /// Grow the box by `dx` on the left and right and `dy` on the top and bottom
    pub fn expand(&self, dx: f64, dy: f64) -> BoundingBox {
        BoundingBox::new(
            self.x - dx,
            self.y - dy,
            self.width + 2.0 * dx,
            self.height + 2.0 * dy,
        )
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}
