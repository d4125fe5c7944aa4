//! List entities query
//!
//! Wraps the listing engine: validation resolves the raw parameters into a
//! planned index read, and the handler executes it in the requested shape.

use std::collections::HashMap;
use std::sync::Arc;

use mediator::Request;

use crate::listing::{
    ListRequest, Listing, ListingEngine, ListingError, ListingSpec, ParamError, Shape,
};

#[derive(Debug, Clone)]
pub struct ListEntitiesQuery {
    pub spec: Arc<ListingSpec>,
    pub shape: Shape,
    /// Raw query string parameters
    pub params: HashMap<String, String>,
}

impl Request<Result<Listing, ListingError>> for ListEntitiesQuery {}

impl ListEntitiesQuery {
    /// Validate every parameter and choose the index read. Never touches the store.
    pub fn validate(&self, engine: &ListingEngine) -> Result<ListRequest, ParamError> {
        engine.plan(&self.spec, &self.params)
    }
}

#[tracing::instrument(skip(engine, query), fields(kind = %query.spec.kind, shape = ?query.shape))]
pub async fn handle(engine: ListingEngine, query: ListEntitiesQuery) -> Result<Listing, ListingError> {
    let request = query.validate(&engine)?;
    let listing = engine.execute(&request, query.shape).await?;

    tracing::debug!(count = listing.len(), "Listing served");
    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::catalog::listing_specs;
    use crate::listing::ListingSettings;
    use crate::store::{EntityStore, MemoryStore};
    use catalog_common::types::EntityKind;
    use serde_json::json;

    fn users_spec() -> Arc<ListingSpec> {
        let spec = listing_specs()
            .into_iter()
            .find(|spec| spec.kind == EntityKind::User)
            .unwrap();
        Arc::new(spec)
    }

    fn query(shape: Shape, pairs: &[(&str, &str)]) -> ListEntitiesQuery {
        ListEntitiesQuery {
            spec: users_spec(),
            shape,
            params: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_validation_names_the_parameter() {
        let store = Arc::new(MemoryStore::new(&listing_specs()));
        let engine = ListingEngine::new(store, ListingSettings::default());

        let err = query(Shape::TextValues, &[("role", "OWNER")])
            .validate(&engine)
            .unwrap_err();
        assert_eq!(err.parameter, "role");
    }

    #[tokio::test]
    async fn test_handle_in_both_shapes() {
        let store = Arc::new(MemoryStore::new(&listing_specs()));
        for (name, role) in [("Ada", "ADMIN"), ("Bob", "VIEWER")] {
            store
                .create(EntityKind::User, json!({"name": name, "role": role}))
                .await
                .unwrap();
        }
        let engine = ListingEngine::new(store, ListingSettings::default());

        let text = handle(engine.clone(), query(Shape::TextValues, &[("role", "ADMIN")]))
            .await
            .unwrap();
        let Listing::TextValues(values) = text else {
            panic!("expected text values");
        };
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].value, "Ada");

        let bodies = handle(engine, query(Shape::Bodies, &[("sorted", "true")]))
            .await
            .unwrap();
        let Listing::Bodies(bodies) = bodies else {
            panic!("expected bodies");
        };
        let names: Vec<_> = bodies.iter().map(|b| b["name"].clone()).collect();
        assert_eq!(names, [json!("Ada"), json!("Bob")]);
    }
}
