use std::sync::Arc;

use catalog_common::types::{EntityId, EntityKind};
use mediator::Request;

use crate::features::entities::{parse_entity_id, EntityError};
use crate::store::{EntityBody, EntityStore};

#[derive(Debug, Clone)]
pub struct GetEntityQuery {
    pub kind: EntityKind,
    pub id: String,
}

impl Request<Result<EntityBody, EntityError>> for GetEntityQuery {}

impl GetEntityQuery {
    pub fn validate(&self) -> Result<(), EntityError> {
        self.entity_id().map(|_| ())
    }

    pub fn entity_id(&self) -> Result<EntityId, EntityError> {
        parse_entity_id(&self.id)
    }
}

#[tracing::instrument(skip(store, query), fields(kind = %query.kind, id = %query.id))]
pub async fn handle(store: Arc<dyn EntityStore>, query: GetEntityQuery) -> Result<EntityBody, EntityError> {
    query.validate()?;
    let id = query.entity_id()?;

    Ok(store.get_body(query.kind, &id).await?)
}
