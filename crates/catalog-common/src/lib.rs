//! Catalog Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging and error handling for the catalog workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`CatalogError`] and the crate-wide [`Result`] alias
//! - **Types**: entity identifiers, entity kinds and text values shared by the
//!   server and its store adapters
//! - **Logging**: centralized `tracing` subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use catalog_common::types::{EntityId, EntityKind};
//!
//! fn parse(raw: &str) -> catalog_common::Result<(EntityKind, EntityId)> {
//!     let kind: EntityKind = "content".parse()?;
//!     let id = EntityId::parse(raw)?;
//!     Ok((kind, id))
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{CatalogError, Result};
