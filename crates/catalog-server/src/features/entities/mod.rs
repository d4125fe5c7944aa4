//! Entity CRUD and listing endpoints
//!
//! One vertical slice serves every entity kind; the kind and its
//! [`ListingSpec`](crate::listing::ListingSpec) are bound when the routes are built.
//!
//! - `commands` - create, replace and delete single entities
//! - `queries` - single reads, existence checks and listings
//! - `routes` - HTTP route definitions

pub mod commands;
pub mod queries;
pub mod routes;

use catalog_common::types::EntityId;
use thiserror::Error;

use crate::error::AppError;
use crate::store::StoreError;

pub use routes::entity_routes;

/// Errors of the single-entity commands and queries
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("'{0}' is not a valid entity id")]
    InvalidId(String),

    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<EntityError> for AppError {
    fn from(err: EntityError) -> Self {
        match err {
            EntityError::InvalidId(_) => AppError::Validation {
                parameter: "id".to_string(),
                message: err.to_string(),
            },
            EntityError::NotAnObject => AppError::BadRequest(err.to_string()),
            EntityError::Store(e) => AppError::Store(e),
        }
    }
}

/// Parse the `:id` path segment.
pub(crate) fn parse_entity_id(raw: &str) -> Result<EntityId, EntityError> {
    EntityId::parse(raw).map_err(|_| EntityError::InvalidId(raw.to_string()))
}
