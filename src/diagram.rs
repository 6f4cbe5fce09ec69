//! The fully resolved model handed to an emitter

use std::fmt;

use indexmap::IndexMap;

use crate::layout::anchor::AnchorSpec;
use crate::layout::config::PageConfig;
use crate::layout::types::{BoundingBox, Element, Position, ResolvedSize};
use crate::parser::ast::{ElementKind, Reference, SubRecord};
use crate::stylesheet::{
    resolve_element_style, ColorRegistry, ElementStyle, RenderPass, StyleValue, Stylesheet,
};

/// A node or edge with settled geometry and style
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedElement {
    pub name: String,
    pub kind: ElementKind,
    pub position: Position,
    pub dimension: Option<ResolvedSize>,
    pub anchor: AnchorSpec,
    pub style: ElementStyle,
    pub records: Vec<SubRecord>,
    /// Scaled box, when position and size are numeric
    pub bounding_box: Option<BoundingBox>,
    pub from: Option<Reference>,
    pub to: Option<Reference>,
}

/// Output of the whole pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDiagram {
    pub elements: IndexMap<String, ResolvedElement>,
    pub colors: ColorRegistry,
    pub page: PageConfig,
    /// Page extent (aggregate box plus margin), if any element has a box
    pub bounds: Option<BoundingBox>,
}

impl ResolvedDiagram {
    /// Style every resolved element in declaration order and collect
    /// the colors registered along the way
    pub fn assemble(
        elements: IndexMap<String, Element>,
        sheet: &Stylesheet,
        page: PageConfig,
    ) -> Self {
        let bounds = BoundingBox::page(elements.values(), &page).ok();
        let mut pass = RenderPass::new();

        let elements = elements
            .into_iter()
            .map(|(name, element)| {
                let style = resolve_element_style(sheet, &element, &mut pass);
                let bounding_box = BoundingBox::of_element(&element).ok();
                let resolved = ResolvedElement {
                    name: element.name,
                    kind: element.kind,
                    position: element.position,
                    dimension: element.dimension,
                    anchor: element.anchor,
                    style,
                    records: element.records,
                    bounding_box,
                    from: element.from,
                    to: element.to,
                };
                (name, resolved)
            })
            .collect();

        Self {
            elements,
            colors: pass.into_colors(),
            page,
            bounds,
        }
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedElement> {
        self.elements.get(name)
    }

    /// Plain-text listing of the model, one block per element
    pub fn dump(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ResolvedDiagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in self.elements.values() {
            write!(f, "{element}")?;
        }
        for (id, hex) in self.colors.iter() {
            writeln!(f, "color {id} = {hex}")?;
        }
        if let Some(bounds) = &self.bounds {
            writeln!(
                f,
                "bounds ({}, {}) {}x{}",
                bounds.x, bounds.y, bounds.width, bounds.height
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for ResolvedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.name)?;
        match &self.position {
            Position::Coordinates(point) => {
                write!(f, " at {} (unscaled {})", point.scaled, point.unscaled)?
            }
            Position::Symbolic(symbolic) => write!(f, " at {symbolic}")?,
            Position::Unplaced => write!(f, " unplaced")?,
            Position::Unresolved => write!(f, " unresolved")?,
        }
        if let Some(size) = &self.dimension {
            write!(f, " size {} (unscaled {})", size.scaled, size.unscaled)?;
        }
        if self.anchor != AnchorSpec::default() {
            write!(f, " anchor {}", self.anchor)?;
        }
        if let Some(from) = &self.from {
            write!(f, " from {from}")?;
        }
        if let Some(to) = &self.to {
            write!(f, " to {to}")?;
        }
        writeln!(f)?;

        for (sub_category, attributes) in &self.style.sub_categories {
            let options: Vec<String> = attributes
                .iter()
                .map(|(key, value)| match value {
                    StyleValue::Flag(true) => key.clone(),
                    value => format!("{key}={value}"),
                })
                .collect();
            writeln!(f, "  {sub_category}: {}", options.join(", "))?;
        }
        for record in &self.records {
            let fields: Vec<String> = record
                .fields
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            writeln!(f, "  record: {}", fields.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::config::ScaleConfig;
    use crate::layout::types::{Point, ResolvedPoint, Size};

    #[test]
    fn test_assemble_keeps_order_and_boxes() {
        let scale = ScaleConfig::default();
        let mut a = Element::new("a");
        a.position = Position::Coordinates(ResolvedPoint::from_unscaled(
            Point::new(0.0, 0.0),
            &scale.position,
        ));
        a.dimension = Some(ResolvedSize::from_unscaled(Size::new(2.0, 2.0), &scale.size));
        let mut e = Element::new("e");
        e.kind = ElementKind::Edge;
        e.position = Position::Unplaced;
        e.from = Some(Reference::element("a"));

        let elements: IndexMap<String, Element> =
            [("e".to_string(), e), ("a".to_string(), a)].into_iter().collect();
        let diagram = ResolvedDiagram::assemble(elements, &Stylesheet::new(), PageConfig::default());

        assert_eq!(diagram.elements.keys().collect::<Vec<_>>(), vec!["e", "a"]);
        assert_eq!(
            diagram.get("a").unwrap().bounding_box,
            Some(BoundingBox::new(-1.0, -1.0, 2.0, 2.0))
        );
        assert_eq!(diagram.get("e").unwrap().bounding_box, None);
        assert_eq!(diagram.bounds, Some(BoundingBox::new(-1.0, -1.0, 2.0, 2.0)));
        assert!(diagram.colors.is_empty());
    }

    #[test]
    fn test_dump_lists_edges_without_geometry() {
        let mut e = Element::new("e");
        e.kind = ElementKind::Edge;
        e.position = Position::Unplaced;
        e.from = Some(Reference::parse("a.east"));
        e.to = Some(Reference::element("b"));

        let elements: IndexMap<String, Element> = [("e".to_string(), e)].into_iter().collect();
        let diagram = ResolvedDiagram::assemble(elements, &Stylesheet::new(), PageConfig::default());
        assert_eq!(diagram.dump(), "edge e unplaced from a.east to b\n");
    }
}
