//! Listing engine
//!
//! Every list endpoint in the API is served by the same pipeline:
//!
//! ```text
//! query string -> ListParams + filters -> dispatch::plan -> store index
//!                                                   |
//!                     (full-object listings) fanout::FanOutRetriever -> bodies
//! ```
//!
//! The per-kind differences (which filters exist, in which precedence, which
//! body field is the display text) are declared once as a [`ListingSpec`] and
//! interpreted by the [`ListingEngine`].

pub mod cursor;
pub mod dispatch;
pub mod engine;
pub mod fanout;
pub mod params;
pub mod search;
pub mod spec;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{DEFAULT_FANOUT_CONCURRENCY, DEFAULT_MAX_LIMIT};

pub use cursor::{Cursor, Page};
pub use dispatch::{ListRequest, Strategy};
pub use engine::{Listing, ListingEngine, ListingError, Shape};
pub use fanout::{FanOutRetriever, FetchSlot};
pub use params::ListParams;
pub use search::SearchQuery;
pub use spec::{FilterKind, FilterSpec, ListingSpec};

/// A malformed query parameter, reported before any store access.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid parameter '{parameter}': {message}")]
pub struct ParamError {
    pub parameter: String,
    pub message: String,
}

impl ParamError {
    pub fn new(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            message: message.into(),
        }
    }
}

/// Request-independent knobs shared by every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSettings {
    /// Upper bound on concurrent body fetches per request.
    pub fanout_concurrency: usize,
    /// Largest `limit` a client may ask for.
    pub max_limit: u32,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            fanout_concurrency: DEFAULT_FANOUT_CONCURRENCY,
            max_limit: DEFAULT_MAX_LIMIT,
        }
    }
}
