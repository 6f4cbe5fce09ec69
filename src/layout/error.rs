//! Error types for the resolver

use thiserror::Error;

/// Errors that stop coordinate and dimension resolution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// Reference to an element name that is not declared anywhere
    #[error("element '{name}' not found (referenced by '{referrer}' via `{field}`)")]
    UnresolvedReference {
        name: String,
        referrer: String,
        field: &'static str,
    },

    /// Reference to an element that was declared without any placement
    #[error("element '{name}' has no position (referenced by '{referrer}' via `{field}`)")]
    Unplaced {
        name: String,
        referrer: String,
        field: &'static str,
    },

    /// Span sizing with only one endpoint
    #[error("span sizing of '{element}' needs both `{axis}_from` and `{axis}_to`")]
    IncompleteSpan { element: String, axis: &'static str },

    /// Span endpoint that cannot be turned into a number
    #[error("span endpoint '{reference}' of '{element}' has no numeric position")]
    NonNumericSpan { element: String, reference: String },

    /// Deferred references never settled within the pass bound
    #[error("cyclic dependency between elements: {}", pending.join(", "))]
    CyclicDependency { pending: Vec<String> },
}

impl ResolveError {
    pub fn not_found(
        name: impl Into<String>,
        referrer: impl Into<String>,
        field: &'static str,
    ) -> Self {
        Self::UnresolvedReference {
            name: name.into(),
            referrer: referrer.into(),
            field,
        }
    }

    pub fn cyclic(pending: Vec<String>) -> Self {
        Self::CyclicDependency { pending }
    }

    /// The element whose resolution failed, if the error concerns one
    pub fn element(&self) -> Option<&str> {
        match self {
            Self::UnresolvedReference { referrer, .. } | Self::Unplaced { referrer, .. } => {
                Some(referrer)
            }
            Self::IncompleteSpan { element, .. } | Self::NonNumericSpan { element, .. } => {
                Some(element)
            }
            Self::CyclicDependency { .. } => None,
        }
    }
}

/// Errors from bounding geometry queries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("element '{name}' has no numeric position")]
    NoPosition { name: String },

    #[error("element '{name}' has no resolved dimension")]
    NoDimension { name: String },

    #[error("no element in the collection has a bounding box")]
    Empty,
}
