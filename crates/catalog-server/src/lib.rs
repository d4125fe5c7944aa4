//! Catalog Server Library
//!
//! JSON HTTP backend exposing CRUD and listing operations over versioned
//! business entities: content, users, organizations, emails, devices, tokens,
//! metrics and events.
//!
//! # Overview
//!
//! - **Listing engine**: cursor pagination, filter precedence, sorted and
//!   search modes, concurrent body fan-out ([`listing`])
//! - **Entity store**: narrow async contract over the versioned store, with an
//!   in-memory implementation ([`store`])
//! - **Audit**: one tower layer recording command outcomes and server errors
//!   ([`audit`])
//! - **Configuration**: environment-based settings ([`config`])
//!
//! # Architecture
//!
//! ```text
//! request -> AuditLayer -> trace/cors/compression/timeout -> entity routes
//!     -> ListingEngine (plan -> index read -> fan-out) -> JSON array
//! ```
//!
//! Every kind is described by one [`listing::ListingSpec`] in
//! [`features::catalog`]; the routes, filters and store indexes all derive
//! from that table.
//!
//! # Example
//!
//! ```no_run
//! use catalog_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await
//! }
//! ```

pub mod api;
pub mod audit;
pub mod config;
pub mod error;
pub mod features;
pub mod listing;
pub mod middleware;
pub mod store;

// Re-export commonly used types
pub use error::{ApiResult, AppError};
