//! Error types shared across the catalog workspace

use thiserror::Error;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Domain errors that are not tied to the HTTP layer
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid entity id: {0}")]
    InvalidEntityId(String),

    #[error("Unknown entity kind: {0}")]
    UnknownEntityKind(String),
}
