use std::sync::Arc;

use catalog_common::types::{EntityId, EntityKind};
use mediator::Request;

use crate::features::entities::{parse_entity_id, EntityError};
use crate::store::EntityStore;

#[derive(Debug, Clone)]
pub struct DeleteEntityCommand {
    pub kind: EntityKind,
    pub id: String,
}

impl Request<Result<(), EntityError>> for DeleteEntityCommand {}

impl DeleteEntityCommand {
    pub fn validate(&self) -> Result<(), EntityError> {
        self.entity_id().map(|_| ())
    }

    pub fn entity_id(&self) -> Result<EntityId, EntityError> {
        parse_entity_id(&self.id)
    }
}

#[tracing::instrument(skip(store, command), fields(kind = %command.kind, id = %command.id))]
pub async fn handle(store: Arc<dyn EntityStore>, command: DeleteEntityCommand) -> Result<(), EntityError> {
    command.validate()?;
    let id = command.entity_id()?;

    store.delete(command.kind, &id).await?;
    Ok(())
}
