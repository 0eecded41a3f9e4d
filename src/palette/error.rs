//! Catalog error types.

use thiserror::Error;

/// Errors that can occur when building a palette catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog has no entries
    #[error("Palette catalog is empty")]
    Empty,

    /// Two entries share an id
    #[error("Duplicate palette entry id '{0}'")]
    DuplicateId(String),

    /// Two entries claim the same route section
    #[error("Route section '{section}' claimed by both '{first}' and '{second}'")]
    DuplicateRoute {
        section: String,
        first: String,
        second: String,
    },

    /// Catalog JSON could not be parsed
    #[error("Catalog parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}
