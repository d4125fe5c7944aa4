//! Fan-out body retrieval
//!
//! Full-object listings read ids from an index and then load each body
//! separately. Loads run concurrently inside the request future, bounded by
//! the page length and the configured ceiling, and land in the slot of their
//! input position.

use std::sync::Arc;

use catalog_common::types::{EntityId, EntityKind};
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::store::{EntityBody, EntityStore};

/// Outcome of one body fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchSlot {
    Found(EntityBody),
    /// Not found, or the fetch failed.
    Missing,
}

impl FetchSlot {
    pub fn into_body(self) -> Option<EntityBody> {
        match self {
            Self::Found(body) => Some(body),
            Self::Missing => None,
        }
    }
}

/// Concurrent, order-preserving body loader.
#[derive(Clone)]
pub struct FanOutRetriever {
    store: Arc<dyn EntityStore>,
    max_concurrency: usize,
}

impl FanOutRetriever {
    pub fn new(store: Arc<dyn EntityStore>, max_concurrency: usize) -> Self {
        Self {
            store,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Fetch every id, returning one slot per id in input order.
    ///
    /// Never fails as a whole: a failed fetch becomes [`FetchSlot::Missing`].
    pub async fn fetch_all(&self, kind: EntityKind, ids: &[EntityId]) -> Vec<FetchSlot> {
        let mut slots = vec![FetchSlot::Missing; ids.len()];
        if ids.is_empty() {
            return slots;
        }

        let concurrency = ids.len().min(self.max_concurrency);
        debug!(kind = %kind, count = ids.len(), concurrency, "Fetching bodies");

        let mut fetches = stream::iter(ids.iter().cloned().enumerate())
            .map(|(index, id)| {
                let store = Arc::clone(&self.store);
                async move {
                    let result = store.get_body(kind, &id).await;
                    (index, id, result)
                }
            })
            .buffer_unordered(concurrency);

        while let Some((index, id, result)) = fetches.next().await {
            match result {
                Ok(body) => slots[index] = FetchSlot::Found(body),
                Err(e) if e.is_not_found() => {
                    debug!(kind = %kind, id = %id, "Indexed entity vanished before fetch");
                },
                Err(e) => {
                    warn!(kind = %kind, id = %id, error = %e, "Body fetch failed");
                },
            }
        }

        slots
    }
}
