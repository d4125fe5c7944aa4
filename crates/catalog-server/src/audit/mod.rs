//! Audit logging module
//!
//! Commands (POST, PUT, PATCH, DELETE) are audited on every outcome. Queries
//! are audited only when they fail on the server side, carrying the original
//! cause recorded by the error handler.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use axum::Router;
//! use catalog_server::audit::{AuditLayer, TracingAuditSink};
//!
//! let app: Router = Router::new().layer(AuditLayer::new(Arc::new(TracingAuditSink)));
//! ```

mod middleware;
mod models;
mod sink;

pub use middleware::AuditLayer;
pub use models::{AuditAction, AuditEvent, AuditEventBuilder, AuditOutcome};
pub use sink::{AuditError, AuditSink, MemoryAuditSink, TracingAuditSink};
