//! Audit sinks
//!
//! The durable audit store lives outside this service. The server records
//! through [`AuditSink`]; the binary logs events under the `audit` target and
//! tests collect them in memory.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use super::models::AuditEvent;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Audit sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for audit events
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, event: AuditEvent) -> Result<(), AuditError>;
}

/// Emits each event as a structured log record under the `audit` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: AuditEvent) -> Result<(), AuditError> {
        info!(
            target: "audit",
            audit_id = %event.id,
            action = %event.action,
            outcome = ?event.outcome,
            resource_kind = ?event.resource_kind,
            resource_id = ?event.resource_id,
            method = %event.method,
            uri = %event.uri,
            status = event.status,
            cause = ?event.cause,
            ip = ?event.ip_address,
            "Audit event"
        );
        Ok(())
    }
}

/// Collects events in memory
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
    unavailable: Mutex<Option<String>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.events.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Reject every subsequent event with the given message.
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.unavailable.lock().await = Some(message.into());
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, event: AuditEvent) -> Result<(), AuditError> {
        if let Some(message) = self.unavailable.lock().await.clone() {
            return Err(AuditError::Unavailable(message));
        }
        self.events.lock().await.push(event);
        Ok(())
    }
}
