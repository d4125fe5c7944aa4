//! Create entity command
//!
//! The store assigns the id and the initial version; the command only
//! guarantees the body is a JSON object.

use std::sync::Arc;

use catalog_common::types::EntityKind;
use mediator::Request;

use crate::features::entities::EntityError;
use crate::store::{EntityBody, EntityStore};

/// Command to create a new entity of `kind`
#[derive(Debug, Clone)]
pub struct CreateEntityCommand {
    pub kind: EntityKind,
    pub body: EntityBody,
}

impl Request<Result<EntityBody, EntityError>> for CreateEntityCommand {}

impl CreateEntityCommand {
    pub fn validate(&self) -> Result<(), EntityError> {
        if !self.body.is_object() {
            return Err(EntityError::NotAnObject);
        }
        Ok(())
    }
}

/// Store the entity and return the stored body, `id` and `version` included.
#[tracing::instrument(skip(store, command), fields(kind = %command.kind))]
pub async fn handle(
    store: Arc<dyn EntityStore>,
    command: CreateEntityCommand,
) -> Result<EntityBody, EntityError> {
    command.validate()?;

    let created = store.create(command.kind, command.body).await?;
    tracing::debug!(id = ?created.get("id"), "Entity stored");
    Ok(created)
}
