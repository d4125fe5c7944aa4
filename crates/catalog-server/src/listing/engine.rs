//! Listing facade
//!
//! Composes dispatch and fan-out for one [`ListingSpec`].

use std::collections::HashMap;
use std::sync::Arc;

use catalog_common::types::TextValue;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use super::dispatch::{self, fetch_entries, ListRequest};
use super::{FanOutRetriever, ListingSettings, ListingSpec, ParamError};
use crate::store::{EntityBody, EntityStore, StoreError};

/// Result shape of a listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `{id, value}` pairs straight from the index.
    TextValues,
    /// Full bodies, expanded through the fan-out retriever.
    Bodies,
}

/// Listing output. Serializes as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Listing {
    TextValues(Vec<TextValue>),
    Bodies(Vec<EntityBody>),
}

impl Listing {
    pub fn len(&self) -> usize {
        match self {
            Self::TextValues(values) => values.len(),
            Self::Bodies(bodies) => bodies.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Error)]
pub enum ListingError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Serves every listing endpoint.
#[derive(Clone)]
pub struct ListingEngine {
    store: Arc<dyn EntityStore>,
    retriever: FanOutRetriever,
    settings: ListingSettings,
}

impl ListingEngine {
    pub fn new(store: Arc<dyn EntityStore>, settings: ListingSettings) -> Self {
        let retriever = FanOutRetriever::new(Arc::clone(&store), settings.fanout_concurrency);
        Self {
            store,
            retriever,
            settings,
        }
    }

    /// Validate raw parameters against `spec` and choose the index read.
    ///
    /// Never touches the store.
    pub fn plan(
        &self,
        spec: &ListingSpec,
        raw: &HashMap<String, String>,
    ) -> Result<ListRequest, ParamError> {
        let request = dispatch::plan(spec, raw, &self.settings)?;
        debug!(index = %request.key, strategy = ?request.strategy, "Listing planned");
        Ok(request)
    }

    /// Read the planned index and shape the result.
    #[instrument(skip(self, request), fields(kind = %request.kind, index = %request.key))]
    pub async fn execute(&self, request: &ListRequest, shape: Shape) -> Result<Listing, StoreError> {
        let entries = fetch_entries(self.store.as_ref(), request).await?;

        match shape {
            Shape::TextValues => Ok(Listing::TextValues(entries)),
            Shape::Bodies => {
                let ids: Vec<_> = entries.into_iter().map(|entry| entry.id).collect();
                let bodies: Vec<_> = self
                    .retriever
                    .fetch_all(request.kind, &ids)
                    .await
                    .into_iter()
                    .filter_map(|slot| slot.into_body())
                    .collect();
                if bodies.len() < ids.len() {
                    debug!(
                        requested = ids.len(),
                        returned = bodies.len(),
                        "Dropped missing bodies from listing"
                    );
                }
                Ok(Listing::Bodies(bodies))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::FilterKind;
    use crate::store::MemoryStore;
    use catalog_common::types::{EntityId, EntityKind};
    use serde_json::json;

    fn content_spec() -> ListingSpec {
        ListingSpec::builder(EntityKind::Content)
            .text_listing("content_titles", "title")
            .filter("type", FilterKind::Enum(&["ARTICLE", "BOOK"]))
            .filter("author", FilterKind::Text)
            .filter_on("tag", "tags", FilterKind::Text)
            .build()
    }

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    async fn engine_with(titles: &[&str]) -> (ListingEngine, Arc<MemoryStore>, Vec<EntityId>) {
        let store = Arc::new(MemoryStore::new(&[content_spec()]));
        let mut ids = Vec::new();
        for title in titles {
            let body = store
                .create(
                    EntityKind::Content,
                    json!({"title": title, "type": "BOOK", "author": "Jane", "tags": ["fiction"]}),
                )
                .await
                .unwrap();
            ids.push(EntityId::parse(body["id"].as_str().unwrap()).unwrap());
        }
        let engine = ListingEngine::new(store.clone(), ListingSettings::default());
        (engine, store, ids)
    }

    async fn list(
        engine: &ListingEngine,
        spec: &ListingSpec,
        shape: Shape,
        raw: &HashMap<String, String>,
    ) -> Result<Listing, ListingError> {
        let request = engine.plan(spec, raw)?;
        Ok(engine.execute(&request, shape).await?)
    }

    fn values(listing: Listing) -> Vec<String> {
        match listing {
            Listing::TextValues(values) => values.into_iter().map(|v| v.value).collect(),
            Listing::Bodies(_) => panic!("expected text values"),
        }
    }

    #[tokio::test]
    async fn test_paged_then_continued() {
        let (engine, _, ids) = engine_with(&["Zebra", "Apple", "Dragon Lore"]).await;
        let spec = content_spec();

        let first = list(
            &engine,
            &spec,
            Shape::TextValues,
            &query(&[("tag", "fiction"), ("limit", "2")]),
        )
        .await
        .unwrap();
        assert_eq!(values(first), ["Zebra", "Apple"]);

        let next = list(
            &engine,
            &spec,
            Shape::TextValues,
            &query(&[("tag", "fiction"), ("limit", "2"), ("offset", ids[1].as_str())]),
        )
        .await
        .unwrap();
        assert_eq!(values(next), ["Dragon Lore"]);
    }

    #[tokio::test]
    async fn test_sorted_returns_everything_by_text() {
        let (engine, _, _) = engine_with(&["Zebra", "Apple", "Dragon Lore"]).await;

        let listing = list(
            &engine,
            &content_spec(),
            Shape::TextValues,
            &query(&[("tag", "fiction"), ("sorted", "true"), ("limit", "1")]),
        )
        .await
        .unwrap();
        assert_eq!(values(listing), ["Apple", "Dragon Lore", "Zebra"]);
    }

    #[tokio::test]
    async fn test_search_filters_case_insensitively() {
        let (engine, _, _) = engine_with(&["Zebra", "Apple", "Dragon Lore"]).await;

        let listing = list(
            &engine,
            &content_spec(),
            Shape::TextValues,
            &query(&[("tag", "fiction"), ("search", "dragon"), ("any", "false")]),
        )
        .await
        .unwrap();
        assert_eq!(values(listing), ["Dragon Lore"]);
    }

    #[tokio::test]
    async fn test_sorted_search_orders_matches_by_text() {
        let (engine, _, _) = engine_with(&["Zebra Dragon", "Apple Dragon", "Mango"]).await;

        let listing = list(
            &engine,
            &content_spec(),
            Shape::TextValues,
            &query(&[("tag", "fiction"), ("search", "dragon"), ("sorted", "true")]),
        )
        .await
        .unwrap();
        assert_eq!(values(listing), ["Apple Dragon", "Zebra Dragon"]);

        let unsorted = list(
            &engine,
            &content_spec(),
            Shape::TextValues,
            &query(&[("tag", "fiction"), ("search", "dragon")]),
        )
        .await
        .unwrap();
        assert_eq!(values(unsorted), ["Zebra Dragon", "Apple Dragon"]);
    }

    #[tokio::test]
    async fn test_bodies_skip_failed_fetches() {
        let (engine, store, ids) = engine_with(&["A", "B", "C"]).await;
        store.fail_fetch(&ids[1]).await;

        let listing = list(&engine, &content_spec(), Shape::Bodies, &HashMap::new())
            .await
            .unwrap();
        let Listing::Bodies(bodies) = listing else {
            panic!("expected bodies");
        };
        let titles: Vec<_> = bodies.iter().map(|b| b["title"].clone()).collect();
        assert_eq!(titles, [json!("A"), json!("C")]);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let (engine, store, _) = engine_with(&["A"]).await;
        store.fail_all("unavailable").await;

        let err = list(&engine, &content_spec(), Shape::TextValues, &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::Store(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn test_planning_never_touches_the_store() {
        let (engine, store, _) = engine_with(&["A"]).await;
        store.fail_all("unavailable").await;

        let err = engine
            .plan(&content_spec(), &query(&[("type", "PODCAST")]))
            .unwrap_err();
        assert_eq!(err.parameter, "type");

        assert!(engine.plan(&content_spec(), &query(&[("type", "BOOK")])).is_ok());
    }

    #[test]
    fn test_listing_serializes_as_array() {
        let id = EntityId::generate();
        let listing = Listing::TextValues(vec![TextValue::new(id.clone(), "Dune")]);
        assert_eq!(
            serde_json::to_value(&listing).unwrap(),
            json!([{"id": id.as_str(), "value": "Dune"}])
        );
    }
}
