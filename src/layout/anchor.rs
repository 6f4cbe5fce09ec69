//! Named anchor points and their direction vectors
//!
//! An anchor names a reference point on an element's box. Each geometric
//! anchor maps to a unit vector whose components are -1, 0 or 1; multiplying
//! the vector by the element's half-extents gives the anchor's offset from the
//! geometric center. The y axis grows upward, so `north` is `(0, 1)`.

use std::fmt;

use super::types::{Point, Size};

/// A geometric anchor understood by the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    Center,
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Anchor {
    /// Every geometric anchor, center first
    pub const ALL: [Anchor; 9] = [
        Anchor::Center,
        Anchor::North,
        Anchor::South,
        Anchor::East,
        Anchor::West,
        Anchor::NorthEast,
        Anchor::NorthWest,
        Anchor::SouthEast,
        Anchor::SouthWest,
    ];

    /// Match an anchor name, ignoring case and word separators.
    ///
    /// Accepts canonical names (`north east`), compact and separated forms
    /// (`northeast`, `north_east`, `North-East`) and abbreviations
    /// (`n`, `ne`, `c`, ...).
    pub fn parse(name: &str) -> Option<Anchor> {
        let compact: String = name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        let anchor = match compact.as_str() {
            "center" | "centre" | "c" => Anchor::Center,
            "north" | "n" => Anchor::North,
            "south" | "s" => Anchor::South,
            "east" | "e" => Anchor::East,
            "west" | "w" => Anchor::West,
            "northeast" | "ne" => Anchor::NorthEast,
            "northwest" | "nw" => Anchor::NorthWest,
            "southeast" | "se" => Anchor::SouthEast,
            "southwest" | "sw" => Anchor::SouthWest,
            _ => return None,
        };
        Some(anchor)
    }

    /// The canonical (multi-word) name of this anchor
    pub fn canonical_name(self) -> &'static str {
        match self {
            Anchor::Center => "center",
            Anchor::North => "north",
            Anchor::South => "south",
            Anchor::East => "east",
            Anchor::West => "west",
            Anchor::NorthEast => "north east",
            Anchor::NorthWest => "north west",
            Anchor::SouthEast => "south east",
            Anchor::SouthWest => "south west",
        }
    }

    /// Unit direction vector
    pub fn vector(self) -> Point {
        match self {
            Anchor::Center => Point::new(0.0, 0.0),
            Anchor::North => Point::new(0.0, 1.0),
            Anchor::South => Point::new(0.0, -1.0),
            Anchor::East => Point::new(1.0, 0.0),
            Anchor::West => Point::new(-1.0, 0.0),
            Anchor::NorthEast => Point::new(1.0, 1.0),
            Anchor::NorthWest => Point::new(-1.0, 1.0),
            Anchor::SouthEast => Point::new(1.0, -1.0),
            Anchor::SouthWest => Point::new(-1.0, -1.0),
        }
    }

    /// Offset of this anchor from the geometric center of a box of `size`
    pub fn offset(self, size: Size) -> Point {
        let v = self.vector();
        Point::new(v.x * size.w / 2.0, v.y * size.h / 2.0)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// An anchor as written by the author: either geometric or a backend-native
/// name the resolver cannot compute (passed through verbatim).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorSpec {
    Geometric(Anchor),
    Native(String),
}

impl AnchorSpec {
    /// Classify an anchor string. Never fails: unknown names become `Native`.
    pub fn parse(name: &str) -> AnchorSpec {
        match Anchor::parse(name) {
            Some(anchor) => AnchorSpec::Geometric(anchor),
            None => AnchorSpec::Native(name.trim().to_string()),
        }
    }

    /// Direction vector used for geometry. Native anchors behave like center.
    pub fn vector(&self) -> Point {
        match self {
            AnchorSpec::Geometric(anchor) => anchor.vector(),
            AnchorSpec::Native(_) => Point::new(0.0, 0.0),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, AnchorSpec::Native(_))
    }
}

impl Default for AnchorSpec {
    fn default() -> Self {
        AnchorSpec::Geometric(Anchor::Center)
    }
}

impl fmt::Display for AnchorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorSpec::Geometric(anchor) => anchor.fmt(f),
            AnchorSpec::Native(name) => f.write_str(name),
        }
    }
}
