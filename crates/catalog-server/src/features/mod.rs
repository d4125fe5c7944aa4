//! Feature modules implementing the catalog API
//!
//! # Features
//!
//! - **catalog**: per-kind listing table (filters, precedence, display field)
//! - **entities**: CRUD and listing endpoints shared by every entity kind
//! - **shared**: validation helpers
//!
//! # Architecture
//!
//! Handlers receive a [`Services`] value as axum state. It holds trait
//! objects for the external collaborators, so tests swap in in-memory fakes.

pub mod catalog;
pub mod entities;
pub mod shared;

use std::sync::Arc;

use axum::Router;

use crate::audit::AuditSink;
use crate::listing::{ListingEngine, ListingSettings, ListingSpec};
use crate::store::EntityStore;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct Services {
    /// Versioned entity store
    pub store: Arc<dyn EntityStore>,
    /// Destination of audit events
    pub audit: Arc<dyn AuditSink>,
    /// Listing engine bound to `store`
    pub engine: ListingEngine,
}

impl Services {
    pub fn new(
        store: Arc<dyn EntityStore>,
        audit: Arc<dyn AuditSink>,
        settings: ListingSettings,
    ) -> Self {
        let engine = ListingEngine::new(Arc::clone(&store), settings);
        Self {
            store,
            audit,
            engine,
        }
    }
}

/// Creates the API router with the routes of every listed kind
pub fn router(services: Services, specs: Vec<ListingSpec>) -> Router<()> {
    specs
        .into_iter()
        .fold(Router::new(), |router, spec| {
            router.merge(entities::entity_routes(spec))
        })
        .with_state(services)
}
