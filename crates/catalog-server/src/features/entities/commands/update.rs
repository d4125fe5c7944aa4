//! Replace entity command

use std::sync::Arc;

use catalog_common::types::{EntityId, EntityKind};
use mediator::Request;

use crate::features::entities::{parse_entity_id, EntityError};
use crate::store::{EntityBody, EntityStore};

/// Command to replace the body of an existing entity
#[derive(Debug, Clone)]
pub struct UpdateEntityCommand {
    pub kind: EntityKind,
    /// Raw `:id` path segment
    pub id: String,
    pub body: EntityBody,
}

impl Request<Result<EntityBody, EntityError>> for UpdateEntityCommand {}

impl UpdateEntityCommand {
    pub fn validate(&self) -> Result<(), EntityError> {
        self.entity_id()?;
        if !self.body.is_object() {
            return Err(EntityError::NotAnObject);
        }
        Ok(())
    }

    pub fn entity_id(&self) -> Result<EntityId, EntityError> {
        parse_entity_id(&self.id)
    }
}

#[tracing::instrument(skip(store, command), fields(kind = %command.kind, id = %command.id))]
pub async fn handle(
    store: Arc<dyn EntityStore>,
    command: UpdateEntityCommand,
) -> Result<EntityBody, EntityError> {
    command.validate()?;
    let id = command.entity_id()?;

    let updated = store.update(command.kind, &id, command.body).await?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::catalog::listing_specs;
    use crate::store::{MemoryStore, StoreError};
    use serde_json::json;

    #[test]
    fn test_validation() {
        let valid = UpdateEntityCommand {
            kind: EntityKind::User,
            id: EntityId::generate().to_string(),
            body: json!({"name": "Ada"}),
        };
        assert!(valid.validate().is_ok());

        let bad_id = UpdateEntityCommand {
            id: "42".to_string(),
            ..valid.clone()
        };
        assert!(matches!(bad_id.validate(), Err(EntityError::InvalidId(_))));

        let bad_body = UpdateEntityCommand {
            body: json!([]),
            ..valid
        };
        assert!(matches!(bad_body.validate(), Err(EntityError::NotAnObject)));
    }

    #[tokio::test]
    async fn test_handle_bumps_version() {
        let store = Arc::new(MemoryStore::new(&listing_specs()));
        let created = store
            .create(EntityKind::User, json!({"name": "Ada"}))
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        let command = UpdateEntityCommand {
            kind: EntityKind::User,
            id,
            body: json!({"name": "Ada Lovelace"}),
        };
        let updated = handle(store, command).await.unwrap();
        assert_eq!(updated["name"], "Ada Lovelace");
        assert_eq!(updated["version"], 2);
    }

    #[tokio::test]
    async fn test_handle_missing_entity() {
        let store = Arc::new(MemoryStore::new(&listing_specs()));
        let command = UpdateEntityCommand {
            kind: EntityKind::User,
            id: EntityId::generate().to_string(),
            body: json!({"name": "ghost"}),
        };

        let err = handle(store, command).await.unwrap_err();
        assert!(matches!(err, EntityError::Store(StoreError::NotFound { .. })));
    }
}
