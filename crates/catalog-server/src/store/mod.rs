//! Entity store interface
//!
//! The versioned entity store is an external collaborator. The server only
//! relies on the narrow contract below: ordered secondary-index reads plus
//! single-record create/read/update/delete. [`memory::MemoryStore`] is the
//! in-process implementation used by the binary and the test suite.

pub mod memory;

use async_trait::async_trait;
use catalog_common::types::{EntityId, EntityKind, TextValue};
use thiserror::Error;

use crate::listing::Page;

pub use memory::MemoryStore;

/// Entity bodies are JSON objects owned by the store; they always carry `id`.
pub type EntityBody = serde_json::Value;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors reported by an [`EntityStore`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: EntityId },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(kind: EntityKind, id: &EntityId) -> Self {
        Self::NotFound {
            kind,
            id: id.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Index selected by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    /// Every entity of the kind.
    Primary,
    /// Entities whose `index` attribute equals `value`.
    By { index: String, value: String },
}

impl IndexKey {
    pub fn by(index: impl Into<String>, value: impl Into<String>) -> Self {
        Self::By {
            index: index.into(),
            value: value.into(),
        }
    }
}

impl std::fmt::Display for IndexKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::By { index, value } => write!(f, "{}={}", index, value),
        }
    }
}

/// One index row: the entity id and its display text.
pub type IndexEntry = TextValue;

/// Narrow contract of the versioned entity store.
///
/// Index reads return entries in ascending id order (descending for a reverse
/// page). Cursors are exclusive.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// One bounded slice of an index.
    async fn page_by_index(
        &self,
        kind: EntityKind,
        key: &IndexKey,
        page: &Page,
    ) -> StoreResult<Vec<IndexEntry>>;

    /// Every entry of an index, in store order.
    async fn all_by_index(&self, kind: EntityKind, key: &IndexKey) -> StoreResult<Vec<IndexEntry>>;

    /// Full body of one entity.
    async fn get_body(&self, kind: EntityKind, id: &EntityId) -> StoreResult<EntityBody>;

    async fn exists(&self, kind: EntityKind, id: &EntityId) -> StoreResult<bool>;

    /// Store a new entity. The store assigns the id and returns the stored body.
    async fn create(&self, kind: EntityKind, body: EntityBody) -> StoreResult<EntityBody>;

    /// Replace an existing entity.
    async fn update(&self, kind: EntityKind, id: &EntityId, body: EntityBody)
        -> StoreResult<EntityBody>;

    async fn delete(&self, kind: EntityKind, id: &EntityId) -> StoreResult<()>;
}
