//! Audit data models

use catalog_common::types::{EntityId, EntityKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Audit action types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Read,
    Other,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Read => "read",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the audited request succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    Success,
    Failure,
}

impl AuditOutcome {
    pub fn from_status(status: u16) -> Self {
        if (200..400).contains(&status) {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// One audited request outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: Uuid,
    pub action: AuditAction,
    pub outcome: AuditOutcome,
    /// Entity kind addressed by the request, when the path names one
    pub resource_kind: Option<EntityKind>,
    pub resource_id: Option<EntityId>,
    pub method: String,
    pub uri: String,
    pub status: u16,
    /// Request body of commands, when it was JSON
    pub changes: Option<JsonValue>,
    /// Original failure cause for 5xx outcomes
    pub cause: Option<String>,
    pub user_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    pub fn builder() -> AuditEventBuilder {
        AuditEventBuilder::default()
    }
}

/// Builder for [`AuditEvent`]
#[derive(Debug, Default)]
pub struct AuditEventBuilder {
    action: Option<AuditAction>,
    status: Option<u16>,
    resource_kind: Option<EntityKind>,
    resource_id: Option<EntityId>,
    method: String,
    uri: String,
    changes: Option<JsonValue>,
    cause: Option<String>,
    user_id: Option<String>,
    ip_address: Option<String>,
    user_agent: Option<String>,
}

impl AuditEventBuilder {
    pub fn action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn resource(mut self, kind: Option<EntityKind>, id: Option<EntityId>) -> Self {
        self.resource_kind = kind;
        self.resource_id = id;
        self
    }

    pub fn request(mut self, method: impl Into<String>, uri: impl Into<String>) -> Self {
        self.method = method.into();
        self.uri = uri.into();
        self
    }

    pub fn changes(mut self, changes: Option<JsonValue>) -> Self {
        self.changes = changes;
        self
    }

    pub fn cause(mut self, cause: Option<String>) -> Self {
        self.cause = cause;
        self
    }

    pub fn user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn ip_address(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }

    pub fn user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Build the event, returning an error if required fields are missing
    pub fn try_build(self) -> Result<AuditEvent, &'static str> {
        let action = self.action.ok_or("action is required")?;
        let status = self.status.ok_or("status is required")?;

        Ok(AuditEvent {
            id: Uuid::new_v4(),
            action,
            outcome: AuditOutcome::from_status(status),
            resource_kind: self.resource_kind,
            resource_id: self.resource_id,
            method: self.method,
            uri: self.uri,
            status,
            changes: self.changes,
            cause: self.cause,
            user_id: self.user_id,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            timestamp: Utc::now(),
        })
    }
}
