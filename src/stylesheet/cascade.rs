//! Style cascade: style-name axis × namespace axis, then element overrides

use indexmap::IndexMap;
use log::{debug, trace};

use super::color::{is_hex_color, RenderPass};
use super::{AttributeMap, StyleValue, Stylesheet, BASE_STYLE};
use crate::layout::types::Element;
use crate::parser::attributes::parse_attributes;

/// Sub-category that unqualified overrides apply to
pub const OBJECT: &str = "object";

/// Keys owned by the geometry engine; ignored in raw attribute strings
pub const RESERVED_KEYS: [&str; 6] = [
    "anchor",
    "shape",
    "size",
    "minimum size",
    "minimum width",
    "minimum height",
];

/// One override layer of the cascade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer<'a> {
    pub style: &'a str,
    pub namespace: &'a str,
    pub attributes: &'a AttributeMap,
}

impl Stylesheet {
    /// Override layers for a sub-category, most generic first.
    ///
    /// For each namespace in order, `base` comes before the requested style.
    /// Unknown style names fall back to `base`.
    pub fn layers<'a>(
        &'a self,
        style: &'a str,
        category: &str,
        sub_category: &str,
    ) -> Vec<Layer<'a>> {
        let styles = self.style_chain(style);
        let mut layers = Vec::new();
        for namespace in &self.namespaces {
            for &name in &styles {
                let attributes = self
                    .styles
                    .get(name)
                    .and_then(|categories| categories.get(category))
                    .and_then(|sub_categories| sub_categories.get(sub_category))
                    .and_then(|namespaces| namespaces.get(namespace.as_str()));
                if let Some(attributes) = attributes {
                    layers.push(Layer {
                        style: name,
                        namespace,
                        attributes,
                    });
                }
            }
        }
        layers
    }

    /// Final attributes for one sub-category. Pure.
    pub fn cascade(&self, style: &str, category: &str, sub_category: &str) -> AttributeMap {
        let mut attributes = AttributeMap::new();
        for layer in self.layers(style, category, sub_category) {
            trace!(
                style = layer.style,
                namespace = layer.namespace,
                keys = layer.attributes.len();
                "applying style layer to {category}.{sub_category}"
            );
            for (key, value) in layer.attributes {
                attributes.insert(key.clone(), value.clone());
            }
        }
        attributes
    }

    /// Sub-categories defined for a category under `base` or `style`,
    /// in first-seen order
    pub fn sub_categories<'a>(&'a self, style: &'a str, category: &str) -> Vec<&'a str> {
        let mut found: Vec<&str> = Vec::new();
        for name in self.style_chain(style) {
            let Some(sub_categories) = self.styles.get(name).and_then(|c| c.get(category)) else {
                continue;
            };
            for sub_category in sub_categories.keys() {
                if !found.contains(&sub_category.as_str()) {
                    found.push(sub_category);
                }
            }
        }
        found
    }

    fn style_chain<'a>(&self, style: &'a str) -> Vec<&'a str> {
        if style == BASE_STYLE {
            vec![BASE_STYLE]
        } else if self.styles.contains_key(style) {
            vec![BASE_STYLE, style]
        } else {
            debug!(style; "unknown style, using base");
            vec![BASE_STYLE]
        }
    }
}

/// Resolved attributes of one element, keyed by sub-category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementStyle {
    pub sub_categories: IndexMap<String, AttributeMap>,
}

impl ElementStyle {
    pub fn get(&self, sub_category: &str) -> Option<&AttributeMap> {
        self.sub_categories.get(sub_category)
    }

    /// The `object` sub-category
    pub fn object(&self) -> Option<&AttributeMap> {
        self.get(OBJECT)
    }

    pub fn attribute(&self, sub_category: &str, key: &str) -> Option<&StyleValue> {
        self.get(sub_category)?.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.sub_categories.is_empty()
    }
}

/// Resolve every sub-category of an element's category.
///
/// Order of application: cascade, `properties` side table, raw attribute
/// string. Hex colors are swapped for ids registered in `pass`.
pub fn resolve_element_style(
    sheet: &Stylesheet,
    element: &Element,
    pass: &mut RenderPass,
) -> ElementStyle {
    let category = element.kind.category();
    let style = element.style.as_deref().unwrap_or(BASE_STYLE);

    let mut sub_categories: IndexMap<String, AttributeMap> = sheet
        .sub_categories(style, category)
        .into_iter()
        .map(|sub| (sub.to_string(), sheet.cascade(style, category, sub)))
        .collect();

    for (key, value) in &element.properties {
        let (sub_category, attribute) = key.split_once('.').unwrap_or((OBJECT, key.as_str()));
        sub_categories
            .entry(sub_category.to_string())
            .or_default()
            .insert(attribute.to_string(), value.clone());
    }

    let raw = parse_attributes(&element.attributes);
    if !raw.is_empty() {
        let object = sub_categories.entry(OBJECT.to_string()).or_default();
        for attribute in raw {
            if RESERVED_KEYS.contains(&attribute.key.as_str()) {
                debug!(element = element.name.as_str(), key = attribute.key.as_str();
                    "ignoring reserved key in attribute string");
                continue;
            }
            let value = match attribute.value {
                Some(value) => StyleValue::Text(value),
                None => StyleValue::Flag(true),
            };
            object.insert(attribute.key, value);
        }
    }

    for attributes in sub_categories.values_mut() {
        *attributes = substitute_colors(std::mem::take(attributes), pass);
    }

    ElementStyle { sub_categories }
}

fn substitute_colors(attributes: AttributeMap, pass: &mut RenderPass) -> AttributeMap {
    attributes
        .into_iter()
        .map(|(key, value)| match value {
            StyleValue::Flag(true) if is_hex_color(&key) => {
                (pass.colors.register(&key), StyleValue::Flag(true))
            }
            StyleValue::Text(text) if is_hex_color(&text) => {
                (key, StyleValue::Text(pass.colors.register(&text)))
            }
            value => (key, value),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::ast::ElementKind;
    use crate::stylesheet::StyleDocument;

    const BASE: &str = r##"
type = "style"

[node.object.common]
draw = "black"
fill = "white"

[node.object.tikz]
shape = "rectangle"

[node.text.common]
font = "sans"

[edge.object.common]
draw = "gray"
"##;

    const CUSTOM: &str = r##"
type = "style"
name = "custom"

[node.object.common]
fill = "#FF0000"

[node.object.tikz]
shape = "circle"

[node.label.latex]
size = "small"
"##;

    fn sheet() -> Stylesheet {
        Stylesheet::from_documents([
            StyleDocument::from_str(BASE).unwrap(),
            StyleDocument::from_str(CUSTOM).unwrap(),
        ])
    }

    fn text(value: &str) -> StyleValue {
        StyleValue::from(value)
    }

    #[test]
    fn test_style_name_axis() {
        let sheet = sheet();
        assert_eq!(sheet.cascade("custom", "node", "object")["shape"], text("circle"));
        assert_eq!(sheet.cascade("base", "node", "object")["shape"], text("rectangle"));
        assert_eq!(sheet.cascade("unknown", "node", "object")["shape"], text("rectangle"));
        // Keys the requested style leaves alone come from base
        assert_eq!(sheet.cascade("custom", "node", "object")["draw"], text("black"));
    }

    #[test]
    fn test_layers_are_namespace_major() {
        let sheet = sheet();
        let layers = sheet.layers("custom", "node", "object");
        let order: Vec<_> = layers.iter().map(|l| (l.style, l.namespace)).collect();
        assert_eq!(
            order,
            vec![
                ("base", "common"),
                ("custom", "common"),
                ("base", "tikz"),
                ("custom", "tikz"),
            ]
        );
    }

    #[test]
    fn test_specific_namespace_beats_requested_style() {
        let documents = [
            "type = \"style\"\n[node.object.tikz]\ndraw = \"blue\"\n",
            "type = \"style\"\nname = \"custom\"\n[node.object.common]\ndraw = \"green\"\n",
        ];
        let sheet = Stylesheet::from_documents(
            documents.iter().map(|d| StyleDocument::from_str(d).unwrap()),
        );
        assert_eq!(sheet.cascade("custom", "node", "object")["draw"], text("blue"));
    }

    #[test]
    fn test_namespaces_outside_order_are_ignored() {
        let sheet = sheet().with_namespaces(["common", "diagram"]);
        let object = sheet.cascade("custom", "node", "object");
        assert!(!object.contains_key("shape"));
        assert_eq!(object["fill"], text("#FF0000"));
    }

    #[test]
    fn test_cascade_is_pure() {
        let sheet = sheet();
        let before = sheet.clone();
        let first = sheet.cascade("custom", "node", "object");
        let second = sheet.cascade("custom", "node", "object");
        assert_eq!(first, second);
        assert_eq!(sheet, before);
    }

    #[test]
    fn test_sub_categories_first_seen() {
        let sheet = sheet();
        assert_eq!(sheet.sub_categories("custom", "node"), vec!["object", "text", "label"]);
        assert_eq!(sheet.sub_categories("base", "node"), vec!["object", "text"]);
        assert!(sheet.sub_categories("base", "group").is_empty());
    }

    #[test]
    fn test_element_style_overlays() {
        let sheet = sheet();
        let mut element = Element::new("n1");
        element.style = Some("custom".to_string());
        element.properties.insert("text.font".to_string(), text("serif"));
        element.properties.insert("draw".to_string(), text("navy"));
        element.attributes = "draw=red, thick, shape=diamond, minimum width=3cm".to_string();

        let mut pass = RenderPass::new();
        let style = resolve_element_style(&sheet, &element, &mut pass);

        let object = style.object().unwrap();
        assert_eq!(object["draw"], text("red"));
        assert_eq!(object["thick"], StyleValue::Flag(true));
        // Reserved keys from the raw string do not override the cascade
        assert_eq!(object["shape"], text("circle"));
        assert!(!object.contains_key("minimum width"));
        assert_eq!(style.attribute("text", "font"), Some(&text("serif")));
        assert_eq!(style.attribute("label", "size"), Some(&text("small")));
    }

    #[test]
    fn test_colors_are_registered_once() {
        let sheet = sheet();
        let mut first = Element::new("a");
        first.style = Some("custom".to_string());
        let mut second = Element::new("b");
        second.attributes = "text=#ff0000, #00f".to_string();

        let mut pass = RenderPass::new();
        let a = resolve_element_style(&sheet, &first, &mut pass);
        let b = resolve_element_style(&sheet, &second, &mut pass);

        assert_eq!(a.attribute("object", "fill"), Some(&text("color1")));
        assert_eq!(b.attribute("object", "text"), Some(&text("color1")));
        assert_eq!(b.attribute("object", "color2"), Some(&StyleValue::Flag(true)));
        assert_eq!(
            pass.into_colors().iter().collect::<Vec<_>>(),
            vec![("color1", "#FF0000"), ("color2", "#00f")]
        );
    }

    #[test]
    fn test_edges_use_edge_category() {
        let sheet = sheet();
        let mut element = Element::new("e");
        element.kind = ElementKind::Edge;
        let style = resolve_element_style(&sheet, &element, &mut RenderPass::new());
        assert_eq!(style.attribute("object", "draw"), Some(&text("gray")));
        assert!(style.get("text").is_none());
    }
}
