//! Errors for reading record and style documents

use thiserror::Error;

/// Errors that can occur when loading or parsing TOML documents
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read document: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse document TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Document has no `type` field (expected \"page\" or \"style\")")]
    MissingType,
    #[error("Unknown document type '{0}' (expected \"page\" or \"style\")")]
    UnknownType(String),
    #[error("Document field `{field}` must be a string")]
    NotAString { field: &'static str },
    #[error("Element record #{index} has an empty name")]
    EmptyName { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            DocumentError::UnknownType("palette".to_string()).to_string(),
            "Unknown document type 'palette' (expected \"page\" or \"style\")"
        );
        assert_eq!(
            DocumentError::EmptyName { index: 2 }.to_string(),
            "Element record #2 has an empty name"
        );
    }
}
