//! Query dispatch
//!
//! Turns raw query parameters into exactly one index read. Filters are tried
//! in the listing's precedence order and the first non-empty one selects the
//! index; the mode is then chosen from `search`, `sorted` and `limit`.

use std::collections::HashMap;

use catalog_common::types::EntityKind;
use tracing::debug;

use super::params::{non_empty, ListParams};
use super::{ListingSettings, ListingSpec, Page, ParamError, SearchQuery};
use crate::store::{EntityStore, IndexEntry, IndexKey, StoreResult};

/// How the selected index is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Read the whole index and keep entries whose display text matches,
    /// optionally ordered by display text.
    Search { query: SearchQuery, sorted: bool },
    /// Read the whole index, optionally ordered by display text.
    All { sorted: bool },
    /// Read one page in store order.
    Paged(Page),
}

/// A validated listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub kind: EntityKind,
    pub key: IndexKey,
    pub strategy: Strategy,
}

/// Validate parameters and choose the index and strategy.
///
/// Every supplied filter is validated, even those outranked by a filter of
/// higher precedence, so a malformed value is always reported.
pub fn plan(
    spec: &ListingSpec,
    raw: &HashMap<String, String>,
    settings: &ListingSettings,
) -> Result<ListRequest, ParamError> {
    let params = ListParams::parse(raw, spec.default_limit, settings.max_limit)?;

    let mut supplied = Vec::new();
    for filter in &spec.filters {
        if let Some(value) = non_empty(raw, filter.param) {
            supplied.push((filter.param, filter.validate(&value)?));
        }
    }

    let mut supplied = supplied.into_iter();
    let key = match supplied.next() {
        Some((param, value)) => IndexKey::by(param, value),
        None => IndexKey::Primary,
    };
    for (ignored, _) in supplied {
        debug!(kind = %spec.kind, filter = ignored, selected = %key, "Filter outranked");
    }

    let strategy = if let Some(search) = &params.search {
        Strategy::Search {
            query: SearchQuery::compile(search, params.any),
            sorted: params.sorted,
        }
    } else if params.sorted || params.limit.is_none() {
        Strategy::All {
            sorted: params.sorted,
        }
    } else {
        Strategy::Paged(Page::new(
            params.reverse,
            params.limit,
            params.offset.as_deref(),
        ))
    };

    Ok(ListRequest {
        kind: spec.kind,
        key,
        strategy,
    })
}

/// Run a planned request against the store.
pub async fn fetch_entries(
    store: &dyn EntityStore,
    request: &ListRequest,
) -> StoreResult<Vec<IndexEntry>> {
    match &request.strategy {
        Strategy::Search { query, sorted } => {
            let entries = store.all_by_index(request.kind, &request.key).await?;
            let total = entries.len();
            let mut matched: Vec<_> = entries
                .into_iter()
                .filter(|entry| query.matches(&entry.value))
                .collect();
            debug!(
                kind = %request.kind,
                index = %request.key,
                terms = ?query.terms(),
                any = query.match_any(),
                total,
                matched = matched.len(),
                "Search applied"
            );
            if *sorted {
                sort_by_text(&mut matched);
            }
            Ok(matched)
        },
        Strategy::All { sorted } => {
            let mut entries = store.all_by_index(request.kind, &request.key).await?;
            if *sorted {
                sort_by_text(&mut entries);
            }
            Ok(entries)
        },
        Strategy::Paged(page) => store.page_by_index(request.kind, &request.key, page).await,
    }
}

/// Stable, so entries with equal text keep store order.
fn sort_by_text(entries: &mut [IndexEntry]) {
    entries.sort_by(|a, b| a.value.cmp(&b.value));
}
