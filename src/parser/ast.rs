//! Element records as declared, and their tokenized placement fields

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::layout::anchor::AnchorSpec;
use crate::layout::types::Axis;
use crate::stylesheet::StyleValue;

/// Node or edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    #[default]
    Node,
    Edge,
}

impl ElementKind {
    /// Top-level stylesheet category for this kind
    pub fn category(self) -> &'static str {
        match self {
            ElementKind::Node => "node",
            ElementKind::Edge => "edge",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

/// One row of a composite (table-like) element
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct SubRecord {
    pub fields: IndexMap<String, StyleValue>,
}

impl SubRecord {
    pub fn new(fields: impl IntoIterator<Item = (String, StyleValue)>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }
}

/// A raw element record, before merging and resolution.
///
/// Every field except the name is optional so that several declarations of
/// the same element can be merged.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementDecl {
    pub name: String,
    pub kind: Option<ElementKind>,

    pub x: Option<f64>,
    pub y: Option<f64>,
    pub position_of: Option<String>,
    pub x_of: Option<String>,
    pub y_of: Option<String>,
    pub adjust_x: Option<f64>,
    pub adjust_y: Option<f64>,

    pub w: Option<f64>,
    pub h: Option<f64>,
    pub w_of: Option<String>,
    pub h_of: Option<String>,
    pub w_from: Option<String>,
    pub w_to: Option<String>,
    pub h_from: Option<String>,
    pub h_to: Option<String>,
    pub adjust_w: Option<f64>,
    pub adjust_h: Option<f64>,

    pub anchor: Option<String>,
    pub style: Option<String>,
    /// Backend option string; concatenated across merges
    pub attributes: Option<String>,
    /// Backend passthrough attributes, keyed `attr` or `subCategory.attr`
    #[serde(default)]
    pub properties: IndexMap<String, StyleValue>,
    #[serde(default)]
    pub records: Vec<SubRecord>,

    pub from: Option<String>,
    pub to: Option<String>,
}

impl ElementDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A tokenized `name` or `name.anchor` reference
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub element: String,
    pub anchor: Option<AnchorSpec>,
    /// The reference as written, trimmed
    pub raw: String,
}

impl Reference {
    /// Split at the first `.`; an empty suffix means no anchor
    pub fn parse(raw: &str) -> Reference {
        let raw = raw.trim();
        match raw.split_once('.') {
            Some((element, anchor)) if !anchor.trim().is_empty() => Reference {
                element: element.trim().to_string(),
                anchor: Some(AnchorSpec::parse(anchor)),
                raw: raw.to_string(),
            },
            Some((element, _)) => Reference::element(element.trim()),
            None => Reference::element(raw),
        }
    }

    pub fn element(name: impl Into<String>) -> Reference {
        let element = name.into();
        Reference {
            raw: element.clone(),
            element,
            anchor: None,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Position declarations of an element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Placement {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub position_of: Option<Reference>,
    pub x_of: Option<Reference>,
    pub y_of: Option<Reference>,
    pub adjust_x: f64,
    pub adjust_y: f64,
}

impl Placement {
    pub fn from_decl(decl: &ElementDecl) -> Self {
        Self {
            x: decl.x,
            y: decl.y,
            position_of: decl.position_of.as_deref().map(Reference::parse),
            x_of: decl.x_of.as_deref().map(Reference::parse),
            y_of: decl.y_of.as_deref().map(Reference::parse),
            adjust_x: decl.adjust_x.unwrap_or(0.0),
            adjust_y: decl.adjust_y.unwrap_or(0.0),
        }
    }

    pub fn literal(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn axis_reference(&self, axis: Axis) -> Option<&Reference> {
        match axis {
            Axis::X => self.x_of.as_ref(),
            Axis::Y => self.y_of.as_ref(),
        }
    }

    pub fn adjust(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.adjust_x,
            Axis::Y => self.adjust_y,
        }
    }
}

/// Size declarations of an element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sizing {
    pub w: Option<f64>,
    pub h: Option<f64>,
    pub w_of: Option<Reference>,
    pub h_of: Option<Reference>,
    pub w_from: Option<Reference>,
    pub w_to: Option<Reference>,
    pub h_from: Option<Reference>,
    pub h_to: Option<Reference>,
    pub adjust_w: f64,
    pub adjust_h: f64,
}

/// Size declarations along one axis
#[derive(Debug, Clone, Copy)]
pub struct AxisSizing<'a> {
    pub literal: Option<f64>,
    pub of: Option<&'a Reference>,
    pub from: Option<&'a Reference>,
    pub to: Option<&'a Reference>,
    pub adjust: f64,
}

impl Sizing {
    pub fn from_decl(decl: &ElementDecl) -> Self {
        let reference = |raw: &Option<String>| raw.as_deref().map(Reference::parse);
        Self {
            w: decl.w,
            h: decl.h,
            w_of: reference(&decl.w_of),
            h_of: reference(&decl.h_of),
            w_from: reference(&decl.w_from),
            w_to: reference(&decl.w_to),
            h_from: reference(&decl.h_from),
            h_to: reference(&decl.h_to),
            adjust_w: decl.adjust_w.unwrap_or(0.0),
            adjust_h: decl.adjust_h.unwrap_or(0.0),
        }
    }

    pub fn axis(&self, axis: Axis) -> AxisSizing<'_> {
        match axis {
            Axis::X => AxisSizing {
                literal: self.w,
                of: self.w_of.as_ref(),
                from: self.w_from.as_ref(),
                to: self.w_to.as_ref(),
                adjust: self.adjust_w,
            },
            Axis::Y => AxisSizing {
                literal: self.h,
                of: self.h_of.as_ref(),
                from: self.h_from.as_ref(),
                to: self.h_to.as_ref(),
                adjust: self.adjust_h,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::anchor::Anchor;

    #[test]
    fn test_reference_without_anchor() {
        let r = Reference::parse("n1");
        assert_eq!(r.element, "n1");
        assert_eq!(r.anchor, None);
        assert_eq!(r.to_string(), "n1");
    }

    #[test]
    fn test_reference_with_geometric_anchor() {
        let r = Reference::parse("n1.NE");
        assert_eq!(r.element, "n1");
        assert_eq!(r.anchor, Some(AnchorSpec::Geometric(Anchor::NorthEast)));
        // Abbreviations stay as written
        assert_eq!(r.to_string(), "n1.NE");
    }

    #[test]
    fn test_reference_with_native_anchor() {
        let r = Reference::parse(" n1.text ");
        assert_eq!(r.anchor, Some(AnchorSpec::Native("text".to_string())));
        assert_eq!(r.to_string(), "n1.text");
    }

    #[test]
    fn test_reference_trailing_dot() {
        assert_eq!(Reference::parse("n1."), Reference::element("n1"));
    }

    #[test]
    fn test_placement_tokenizes_references() {
        let decl = ElementDecl {
            x_of: Some("a.east".to_string()),
            adjust_y: Some(4.0),
            ..ElementDecl::new("b")
        };
        let placement = Placement::from_decl(&decl);
        assert_eq!(placement.axis_reference(Axis::X).unwrap().element, "a");
        assert!(placement.axis_reference(Axis::Y).is_none());
        assert_eq!(placement.adjust(Axis::Y), 4.0);
        assert_eq!(placement.adjust(Axis::X), 0.0);
    }

    #[test]
    fn test_sizing_axis_view() {
        let decl = ElementDecl {
            h_from: Some("a.north".to_string()),
            h_to: Some("b.south".to_string()),
            adjust_h: Some(-2.0),
            w: Some(3.0),
            ..ElementDecl::new("bar")
        };
        let sizing = Sizing::from_decl(&decl);
        let h = sizing.axis(Axis::Y);
        assert_eq!(h.from.unwrap().element, "a");
        assert_eq!(h.to.unwrap().element, "b");
        assert_eq!(h.adjust, -2.0);
        assert_eq!(sizing.axis(Axis::X).literal, Some(3.0));
    }

    #[test]
    fn test_decl_rejects_unknown_fields() {
        let result: Result<ElementDecl, _> = toml::from_str("name = \"a\"\nwidth = 3");
        assert!(result.is_err());
    }
}
