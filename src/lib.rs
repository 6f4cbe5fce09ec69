//! Diagram Resolver - geometry and style resolution for declarative diagrams
//!
//! This library turns element records (nodes and edges with literal or
//! relative positions, sizes, anchors and style references) into a fully
//! resolved model: dual-unit coordinates and sizes, bounding boxes, and
//! per-element attribute maps produced by a two-axis style cascade.
//!
//! # Example
//!
//! ```rust
//! use diagram_resolver::resolve;
//!
//! let records = r#"
//! [[element]]
//! name = "n1"
//! x = 100
//! y = 100
//! w = 50
//! h = 30
//!
//! [[element]]
//! name = "label"
//! position_of = "n1.north"
//! "#;
//!
//! let diagram = resolve(records, &[]).unwrap();
//! let label = diagram.get("label").unwrap();
//! let point = label.position.coordinates().unwrap();
//! assert_eq!((point.scaled.x, point.scaled.y), (100.0, 115.0));
//! ```

pub mod diagram;
pub mod error;
pub mod layout;
pub mod merge;
pub mod parser;
pub mod stylesheet;

pub use diagram::{ResolvedDiagram, ResolvedElement};
pub use error::DocumentError;
pub use layout::{ConfigError, GeometryError, PageConfig, ResolveConfig, ResolveError};
pub use merge::merge_declarations;
pub use parser::{parse_records, ElementDecl};
pub use stylesheet::{ColorRegistry, ElementStyle, StyleDocument, Stylesheet};

use indexmap::IndexMap;
use thiserror::Error;

use layout::Element;
use stylesheet::DEFAULT_NAMESPACES;

/// Errors that can occur during the resolution pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error reading records or style documents
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Invalid page configuration
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Error during coordinate and dimension resolution
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),
}

/// Configuration for the complete resolution pipeline
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Driver configuration
    pub resolve: ResolveConfig,
    /// Style namespaces, most generic first
    pub namespaces: Vec<String>,
    /// Debug mode: print the resolved model to stderr
    pub debug: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolve: ResolveConfig::default(),
            namespaces: DEFAULT_NAMESPACES.iter().map(|ns| ns.to_string()).collect(),
            debug: false,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the driver configuration
    pub fn with_resolve(mut self, config: ResolveConfig) -> Self {
        self.resolve = config;
        self
    }

    /// Set the namespace order
    pub fn with_namespaces(
        mut self,
        namespaces: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Resolve TOML records against TOML style documents with default configuration
///
/// This is the main entry point for the library. Documents are merged in the
/// order given.
pub fn resolve(records: &str, documents: &[&str]) -> Result<ResolvedDiagram, RenderError> {
    let decls = parse_records(records)?;
    let documents = documents
        .iter()
        .map(|document| StyleDocument::from_str(document))
        .collect::<Result<Vec<_>, _>>()?;
    resolve_with_config(decls, documents, &RenderConfig::default())
}

/// Resolve parsed declarations and documents with custom configuration
///
/// # Example
///
/// ```rust
/// use diagram_resolver::{
///     resolve_with_config, ElementDecl, RenderConfig, ResolveConfig, StyleDocument,
/// };
///
/// let mut node = ElementDecl::new("a");
/// node.x = Some(1.0);
/// node.y = Some(2.0);
///
/// let config = RenderConfig::new().with_resolve(ResolveConfig::new().with_max_passes(4));
/// let documents: Vec<StyleDocument> = Vec::new();
/// let diagram = resolve_with_config([node], documents, &config).unwrap();
/// assert!(diagram.get("a").unwrap().bounding_box.is_some());
/// ```
pub fn resolve_with_config(
    decls: impl IntoIterator<Item = ElementDecl>,
    documents: impl IntoIterator<Item = StyleDocument>,
    config: &RenderConfig,
) -> Result<ResolvedDiagram, RenderError> {
    let sheet = Stylesheet::from_documents(documents).with_namespaces(config.namespaces.clone());
    let page = sheet.page_config()?;

    let mut elements: IndexMap<String, Element> = merge_declarations(decls)
        .into_iter()
        .map(|(name, decl)| (name, Element::from(decl)))
        .collect();

    layout::resolve(&mut elements, &page.scale, &config.resolve)?;

    let diagram = ResolvedDiagram::assemble(elements, &sheet, page);

    // Debug output
    if config.debug {
        eprintln!("=== Resolution Debug ===");
        eprint!("{diagram}");
        eprintln!("========================");
    }

    Ok(diagram)
}
