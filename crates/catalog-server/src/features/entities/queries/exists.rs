use std::sync::Arc;

use catalog_common::types::{EntityId, EntityKind};
use mediator::Request;

use crate::features::entities::{parse_entity_id, EntityError};
use crate::store::EntityStore;

/// Existence check backing `HEAD /{collection}/:id`
#[derive(Debug, Clone)]
pub struct EntityExistsQuery {
    pub kind: EntityKind,
    pub id: String,
}

impl Request<Result<bool, EntityError>> for EntityExistsQuery {}

impl EntityExistsQuery {
    pub fn validate(&self) -> Result<(), EntityError> {
        self.entity_id().map(|_| ())
    }

    pub fn entity_id(&self) -> Result<EntityId, EntityError> {
        parse_entity_id(&self.id)
    }
}

#[tracing::instrument(skip(store, query), fields(kind = %query.kind, id = %query.id))]
pub async fn handle(store: Arc<dyn EntityStore>, query: EntityExistsQuery) -> Result<bool, EntityError> {
    query.validate()?;
    let id = query.entity_id()?;

    Ok(store.exists(query.kind, &id).await?)
}
