//! Stylesheet system: named styles layered over attribute namespaces
//!
//! A stylesheet maps `style → category → sub-category → namespace →
//! attribute`. It is built once from TOML documents, merged in declaration
//! order, and is read-only afterwards.

mod cascade;
mod color;

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::DocumentError;
use crate::layout::config::{ConfigError, PageConfig, PageDocument};

pub use cascade::{resolve_element_style, ElementStyle, Layer, OBJECT, RESERVED_KEYS};
pub use color::{is_hex_color, ColorRegistry, RenderPass};

/// Style name consulted as the final fallback
pub const BASE_STYLE: &str = "base";

/// Namespace order, most generic first
pub const DEFAULT_NAMESPACES: [&str; 4] = ["common", "diagram", "latex", "tikz"];

/// An attribute value: text, number or boolean flag
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl StyleValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StyleValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Flag(flag) => write!(f, "{flag}"),
            StyleValue::Number(number) => write!(f, "{number}"),
            StyleValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(text: &str) -> Self {
        StyleValue::Text(text.to_string())
    }
}

pub type AttributeMap = IndexMap<String, StyleValue>;
pub type NamespaceMap = IndexMap<String, AttributeMap>;
pub type SubCategoryMap = IndexMap<String, NamespaceMap>;
pub type CategoryMap = IndexMap<String, SubCategoryMap>;

/// One parsed style or page document
#[derive(Debug, Clone, PartialEq)]
pub enum StyleDocument {
    Page(PageDocument),
    Style { name: String, categories: CategoryMap },
}

impl StyleDocument {
    /// Load a document from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a document from a TOML string.
    ///
    /// The top-level `type` field selects `page` or `style`; style documents
    /// take an optional `name` (default `base`).
    pub fn from_str(content: &str) -> Result<Self, DocumentError> {
        let mut table: toml::Table = toml::from_str(content)?;
        let kind = string_field(&mut table, "type")?.ok_or(DocumentError::MissingType)?;
        let name = string_field(&mut table, "name")?;

        match kind.as_str() {
            "page" => Ok(StyleDocument::Page(toml::Value::Table(table).try_into()?)),
            "style" => Ok(StyleDocument::Style {
                name: name.unwrap_or_else(|| BASE_STYLE.to_string()),
                categories: toml::Value::Table(table).try_into()?,
            }),
            _ => Err(DocumentError::UnknownType(kind)),
        }
    }
}

fn string_field(
    table: &mut toml::Table,
    field: &'static str,
) -> Result<Option<String>, DocumentError> {
    match table.remove(field) {
        None => Ok(None),
        Some(toml::Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(DocumentError::NotAString { field }),
    }
}

/// Merged styles, namespace order and page settings
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    styles: IndexMap<String, CategoryMap>,
    namespaces: Vec<String>,
    page: PageDocument,
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Stylesheet {
    /// Empty stylesheet with the default namespace order
    pub fn new() -> Self {
        Self {
            styles: IndexMap::new(),
            namespaces: DEFAULT_NAMESPACES.iter().map(|ns| ns.to_string()).collect(),
            page: PageDocument::default(),
        }
    }

    /// Replace the namespace order (most generic first)
    pub fn with_namespaces(
        mut self,
        namespaces: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    /// Build a stylesheet by merging documents in order
    pub fn from_documents(documents: impl IntoIterator<Item = StyleDocument>) -> Self {
        let mut sheet = Self::new();
        for document in documents {
            sheet.merge_document(document);
        }
        sheet
    }

    /// Deep-merge a document; later leaves override earlier ones
    pub fn merge_document(&mut self, document: StyleDocument) {
        match document {
            StyleDocument::Page(page) => self.page.merge(&page),
            StyleDocument::Style { name, categories } => {
                let style = self.styles.entry(name).or_default();
                for (category, sub_categories) in categories {
                    let category = style.entry(category).or_default();
                    for (sub_category, namespaces) in sub_categories {
                        let sub_category = category.entry(sub_category).or_default();
                        for (namespace, attributes) in namespaces {
                            sub_category.entry(namespace).or_default().extend(attributes);
                        }
                    }
                }
            }
        }
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    pub fn has_style(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn style(&self, name: &str) -> Option<&CategoryMap> {
        self.styles.get(name)
    }

    /// Merged page document, validated into a page config
    pub fn page_config(&self) -> Result<PageConfig, ConfigError> {
        self.page.build()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const BASE: &str = r##"
type = "style"

[node.object.common]
draw = "black"
"line width" = 0.4

[node.object.tikz]
shape = "rectangle"
"##;

    #[test]
    fn test_parse_style_document() {
        let StyleDocument::Style { name, categories } = StyleDocument::from_str(BASE).unwrap()
        else {
            panic!("expected a style document");
        };
        assert_eq!(name, "base");
        let object = &categories["node"]["object"];
        assert_eq!(object["common"]["draw"], StyleValue::from("black"));
        assert_eq!(object["common"]["line width"], StyleValue::Number(0.4));
        assert_eq!(object["tikz"]["shape"], StyleValue::from("rectangle"));
    }

    #[test]
    fn test_parse_page_document() {
        let document = StyleDocument::from_str(
            "type = \"page\"\n[scale.position]\nx = 2\n[margin]\nw = 1.5\n",
        )
        .unwrap();
        let StyleDocument::Page(page) = document else {
            panic!("expected a page document");
        };
        assert_eq!(page.scale.position.x, Some(2.0));
        assert_eq!(page.margin.w, Some(1.5));
    }

    #[test]
    fn test_document_type_errors() {
        assert!(matches!(
            StyleDocument::from_str("name = \"x\""),
            Err(DocumentError::MissingType)
        ));
        assert!(matches!(
            StyleDocument::from_str("type = \"palette\""),
            Err(DocumentError::UnknownType(kind)) if kind == "palette"
        ));
        assert!(matches!(
            StyleDocument::from_str("type = 3"),
            Err(DocumentError::NotAString { field: "type" })
        ));
        assert!(matches!(
            StyleDocument::from_str("this is not valid toml {{{{"),
            Err(DocumentError::ParseError(_))
        ));
    }

    #[test]
    fn test_merge_overrides_leaves_only() {
        let later = r##"
type = "style"

[node.object.common]
draw = "red"
"##;
        let sheet = Stylesheet::from_documents([
            StyleDocument::from_str(BASE).unwrap(),
            StyleDocument::from_str(later).unwrap(),
        ]);
        let common = &sheet.style("base").unwrap()["node"]["object"]["common"];
        assert_eq!(common["draw"], StyleValue::from("red"));
        assert_eq!(common["line width"], StyleValue::Number(0.4));
    }

    #[test]
    fn test_page_documents_merge_in_order() {
        let sheet = Stylesheet::from_documents([
            StyleDocument::from_str("type = \"page\"\n[scale.size]\nw = 2\nh = 3\n").unwrap(),
            StyleDocument::from_str("type = \"page\"\n[scale.size]\nh = 4\n").unwrap(),
        ]);
        let page = sheet.page_config().unwrap();
        assert_eq!(page.scale.size.w, 2.0);
        assert_eq!(page.scale.size.h, 4.0);
    }

    #[test]
    fn test_default_namespaces() {
        let sheet = Stylesheet::default();
        assert_eq!(sheet.namespaces(), ["common", "diagram", "latex", "tikz"]);
        let sheet = sheet.with_namespaces(["common", "svg"]);
        assert_eq!(sheet.namespaces(), ["common", "svg"]);
    }
}
