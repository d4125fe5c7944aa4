//! Common types used across the catalog

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CatalogError, Result};

// ============================================================================
// Identifiers
// ============================================================================

/// Time-ordered, lexicographically sortable entity identifier.
///
/// The canonical form is the lowercase hyphenated text of a UUIDv7, so the
/// string order of two identifiers equals their creation order.
///
/// # Examples
///
/// ```rust
/// use catalog_common::types::EntityId;
///
/// let first = EntityId::generate();
/// let second = EntityId::generate();
/// assert!(first < second);
///
/// let parsed = EntityId::parse(&first.as_str().to_uppercase()).unwrap();
/// assert_eq!(parsed, first);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generate a fresh identifier ordered after every identifier previously
    /// generated in this process.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Parse and normalize an identifier supplied by a client.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        Uuid::parse_str(trimmed)
            .map(|uuid| Self(uuid.to_string()))
            .map_err(|_| CatalogError::InvalidEntityId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

// Lets ordered collections keyed by `EntityId` be probed with raw cursor text.
impl std::borrow::Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for EntityId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// ============================================================================
// Entity Kinds
// ============================================================================

/// The versioned business entities exposed by the catalog API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Content,
    User,
    Organization,
    Email,
    Device,
    Token,
    Metric,
    Event,
}

impl EntityKind {
    /// Every kind, in routing order.
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Content,
        EntityKind::User,
        EntityKind::Organization,
        EntityKind::Email,
        EntityKind::Device,
        EntityKind::Token,
        EntityKind::Metric,
        EntityKind::Event,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::User => "user",
            Self::Organization => "organization",
            Self::Email => "email",
            Self::Device => "device",
            Self::Token => "token",
            Self::Metric => "metric",
            Self::Event => "event",
        }
    }

    /// Collection path segment used under `/api/v1`.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::User => "users",
            Self::Organization => "organizations",
            Self::Email => "emails",
            Self::Device => "devices",
            Self::Token => "tokens",
            Self::Metric => "metrics",
            Self::Event => "events",
        }
    }

    /// Resolve a kind from a collection path segment.
    pub fn from_collection(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.collection() == segment)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered || kind.collection() == lowered)
            .ok_or_else(|| CatalogError::UnknownEntityKind(s.to_string()))
    }
}

// ============================================================================
// Listing Types
// ============================================================================

/// Lightweight `(id, display text)` pair served by drop-down style listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextValue {
    pub id: EntityId,
    pub value: String,
}

impl TextValue {
    pub fn new(id: EntityId, value: impl Into<String>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }
}
