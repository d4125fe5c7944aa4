//! In-memory entity store
//!
//! Bodies are kept per kind in id order, and every configured index field
//! is mirrored into an ordered id set per value. Because ids are UUIDv7 text,
//! id order is creation order for both the primary and secondary indexes.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::ops::Bound;

use async_trait::async_trait;
use catalog_common::types::{EntityId, EntityKind, TextValue};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::{EntityBody, EntityStore, IndexEntry, IndexKey, StoreError, StoreResult};
use crate::listing::{Cursor, FilterSpec, ListingSpec, Page};

const ID_FIELD: &str = "id";
const VERSION_FIELD: &str = "version";

#[derive(Debug, Clone)]
struct KindSchema {
    display_field: &'static str,
    indexes: Vec<FilterSpec>,
}

impl Default for KindSchema {
    fn default() -> Self {
        Self {
            display_field: "name",
            indexes: Vec::new(),
        }
    }
}

impl KindSchema {
    fn has_index(&self, name: &str) -> bool {
        self.indexes.iter().any(|f| f.param == name)
    }

    /// Index keys an entity body belongs to.
    fn keys_for(&self, body: &EntityBody) -> Vec<IndexKey> {
        let mut keys = Vec::new();
        for filter in &self.indexes {
            let values = match body.get(filter.field) {
                Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
                Some(value) => scalar_text(value).into_iter().collect(),
                None => Vec::new(),
            };
            for raw in values {
                // Index under the same normalized form the listing filters use.
                let value = filter.kind.validate(&raw).unwrap_or(raw);
                let key = IndexKey::by(filter.param, value);
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    fn display_text(&self, body: &EntityBody) -> String {
        match body.get(self.display_field) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[derive(Debug, Default)]
struct Table {
    bodies: BTreeMap<EntityId, EntityBody>,
    indexes: HashMap<IndexKey, BTreeSet<EntityId>>,
}

impl Table {
    fn insert(&mut self, schema: &KindSchema, id: EntityId, body: EntityBody) {
        for key in schema.keys_for(&body) {
            self.indexes.entry(key).or_default().insert(id.clone());
        }
        self.bodies.insert(id, body);
    }

    fn remove(&mut self, schema: &KindSchema, id: &EntityId) -> Option<EntityBody> {
        let body = self.bodies.remove(id)?;
        for key in schema.keys_for(&body) {
            if let Some(ids) = self.indexes.get_mut(&key) {
                ids.remove(id);
                if ids.is_empty() {
                    self.indexes.remove(&key);
                }
            }
        }
        Some(body)
    }

    fn entries<'a>(
        &self,
        schema: &KindSchema,
        ids: impl Iterator<Item = &'a EntityId>,
    ) -> Vec<IndexEntry> {
        ids.filter_map(|id| {
            self.bodies
                .get(id)
                .map(|body| TextValue::new(id.clone(), schema.display_text(body)))
        })
        .collect()
    }

    fn page(&self, schema: &KindSchema, key: &IndexKey, page: &Page) -> Vec<IndexEntry> {
        let Some(range) = page_bounds(page) else {
            return Vec::new();
        };
        let limit = page.limit.map(|l| l as usize).unwrap_or(usize::MAX);

        match key {
            IndexKey::Primary => {
                let ids = self.bodies.range::<str, _>(range).map(|(id, _)| id);
                if page.reverse {
                    self.entries(schema, ids.rev().take(limit))
                } else {
                    self.entries(schema, ids.take(limit))
                }
            },
            IndexKey::By { .. } => {
                let Some(set) = self.indexes.get(key) else {
                    return Vec::new();
                };
                let ids = set.range::<str, _>(range);
                if page.reverse {
                    self.entries(schema, ids.rev().take(limit))
                } else {
                    self.entries(schema, ids.take(limit))
                }
            },
        }
    }
}

/// Range of ids strictly past the cursor in the page direction, or `None`
/// when the cursor is already at the far end.
fn page_bounds(page: &Page) -> Option<(Bound<&str>, Bound<&str>)> {
    match (&page.offset, page.reverse) {
        (Cursor::Min, false) | (Cursor::Max, true) => Some((Bound::Unbounded, Bound::Unbounded)),
        (Cursor::Min, true) | (Cursor::Max, false) => None,
        (Cursor::After(c), false) => Some((Bound::Excluded(c.as_str()), Bound::Unbounded)),
        (Cursor::After(c), true) => Some((Bound::Unbounded, Bound::Excluded(c.as_str()))),
    }
}

#[derive(Debug, Default)]
struct Failures {
    all: Option<String>,
    fetch: HashSet<EntityId>,
}

/// In-process [`EntityStore`].
///
/// # Examples
///
/// ```rust,ignore
/// let store = MemoryStore::new(&catalog::listing_specs());
/// let body = store.create(EntityKind::Content, json!({"title": "Dune"})).await?;
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    schemas: HashMap<EntityKind, KindSchema>,
    tables: RwLock<HashMap<EntityKind, Table>>,
    failures: RwLock<Failures>,
}

impl MemoryStore {
    /// Build a store maintaining the indexes the given listings read.
    pub fn new(specs: &[ListingSpec]) -> Self {
        let schemas = specs
            .iter()
            .map(|spec| {
                (
                    spec.kind,
                    KindSchema {
                        display_field: spec.display_field,
                        indexes: spec.filters.clone(),
                    },
                )
            })
            .collect();

        Self {
            schemas,
            ..Self::default()
        }
    }

    /// Make every subsequent operation fail with a backend error.
    pub async fn fail_all(&self, message: impl Into<String>) {
        self.failures.write().await.all = Some(message.into());
    }

    /// Make body fetches of one entity fail with a backend error.
    pub async fn fail_fetch(&self, id: &EntityId) {
        self.failures.write().await.fetch.insert(id.clone());
    }

    pub async fn clear_failures(&self) {
        *self.failures.write().await = Failures::default();
    }

    /// Number of stored entities of a kind.
    pub async fn count(&self, kind: EntityKind) -> usize {
        self.tables
            .read()
            .await
            .get(&kind)
            .map_or(0, |table| table.bodies.len())
    }

    fn schema(&self, kind: EntityKind) -> KindSchema {
        self.schemas.get(&kind).cloned().unwrap_or_default()
    }

    async fn check_available(&self) -> StoreResult<()> {
        match &self.failures.read().await.all {
            Some(message) => Err(StoreError::Backend(message.clone())),
            None => Ok(()),
        }
    }

    fn check_index(&self, kind: EntityKind, key: &IndexKey) -> StoreResult<()> {
        match key {
            IndexKey::By { index, .. } if !self.schema(kind).has_index(index) => Err(
                StoreError::Backend(format!("{} has no index named '{}'", kind, index)),
            ),
            _ => Ok(()),
        }
    }
}

fn into_object(body: EntityBody) -> StoreResult<serde_json::Map<String, Value>> {
    match body {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Backend(format!(
            "entity body must be a JSON object, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn page_by_index(
        &self,
        kind: EntityKind,
        key: &IndexKey,
        page: &Page,
    ) -> StoreResult<Vec<IndexEntry>> {
        self.check_available().await?;
        self.check_index(kind, key)?;

        let schema = self.schema(kind);
        let tables = self.tables.read().await;
        Ok(tables
            .get(&kind)
            .map(|table| table.page(&schema, key, page))
            .unwrap_or_default())
    }

    async fn all_by_index(&self, kind: EntityKind, key: &IndexKey) -> StoreResult<Vec<IndexEntry>> {
        self.page_by_index(kind, key, &Page::new(false, None, None))
            .await
    }

    async fn get_body(&self, kind: EntityKind, id: &EntityId) -> StoreResult<EntityBody> {
        self.check_available().await?;
        if self.failures.read().await.fetch.contains(id) {
            return Err(StoreError::Backend(format!("fetch of {} {} failed", kind, id)));
        }

        self.tables
            .read()
            .await
            .get(&kind)
            .and_then(|table| table.bodies.get(id))
            .cloned()
            .ok_or_else(|| StoreError::not_found(kind, id))
    }

    async fn exists(&self, kind: EntityKind, id: &EntityId) -> StoreResult<bool> {
        self.check_available().await?;
        Ok(self
            .tables
            .read()
            .await
            .get(&kind)
            .is_some_and(|table| table.bodies.contains_key(id)))
    }

    async fn create(&self, kind: EntityKind, body: EntityBody) -> StoreResult<EntityBody> {
        self.check_available().await?;
        let mut object = into_object(body)?;

        let id = EntityId::generate();
        object.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        object.insert(VERSION_FIELD.to_string(), Value::from(1u64));
        let body = Value::Object(object);

        let schema = self.schema(kind);
        self.tables
            .write()
            .await
            .entry(kind)
            .or_default()
            .insert(&schema, id.clone(), body.clone());

        debug!(kind = %kind, id = %id, "Entity created");
        Ok(body)
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: &EntityId,
        body: EntityBody,
    ) -> StoreResult<EntityBody> {
        self.check_available().await?;
        let mut object = into_object(body)?;

        let schema = self.schema(kind);
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(&kind)
            .ok_or_else(|| StoreError::not_found(kind, id))?;
        let previous = table
            .remove(&schema, id)
            .ok_or_else(|| StoreError::not_found(kind, id))?;

        let version = previous
            .get(VERSION_FIELD)
            .and_then(Value::as_u64)
            .unwrap_or(0)
            + 1;
        object.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        object.insert(VERSION_FIELD.to_string(), Value::from(version));
        let body = Value::Object(object);

        table.insert(&schema, id.clone(), body.clone());

        debug!(kind = %kind, id = %id, version, "Entity updated");
        Ok(body)
    }

    async fn delete(&self, kind: EntityKind, id: &EntityId) -> StoreResult<()> {
        self.check_available().await?;

        let schema = self.schema(kind);
        let mut tables = self.tables.write().await;
        tables
            .get_mut(&kind)
            .and_then(|table| table.remove(&schema, id))
            .ok_or_else(|| StoreError::not_found(kind, id))?;

        debug!(kind = %kind, id = %id, "Entity deleted");
        Ok(())
    }
}
