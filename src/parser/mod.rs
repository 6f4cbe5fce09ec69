//! Readers for element records and backend attribute strings

pub mod ast;
pub mod attributes;
pub mod lexer;

use std::path::Path;

use serde::Deserialize;

use crate::error::DocumentError;

pub use ast::*;
pub use attributes::{parse_attributes, parse_attributes_checked, Attribute, MalformedAttribute};

/// A record file: an array of `[[element]]` tables
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RecordFile {
    #[serde(default)]
    element: Vec<ElementDecl>,
}

/// Parse element records from TOML text
pub fn parse_records(source: &str) -> Result<Vec<ElementDecl>, DocumentError> {
    let file: RecordFile = toml::from_str(source)?;
    if let Some(index) = file.element.iter().position(|decl| decl.name.trim().is_empty()) {
        return Err(DocumentError::EmptyName { index });
    }
    Ok(file.element)
}

/// Parse element records from a TOML file
pub fn parse_records_file(path: &Path) -> Result<Vec<ElementDecl>, DocumentError> {
    let content = std::fs::read_to_string(path)?;
    parse_records(&content)
}
