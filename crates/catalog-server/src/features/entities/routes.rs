//! Entity API routes
//!
//! # Route Structure
//!
//! For a kind with collection `users` and text listing `user_names`:
//!
//! - `GET /api/v1/users` - List full bodies
//! - `GET /api/v1/user_names` - List `{id, value}` pairs
//! - `POST /api/v1/users` - Create
//! - `GET /api/v1/users/:id` - Read one
//! - `HEAD /api/v1/users/:id` - Existence check
//! - `PUT /api/v1/users/:id` - Replace
//! - `DELETE /api/v1/users/:id` - Delete
//!
//! Every listing accepts `reverse`, `limit`, `offset`, `sorted`, `search`,
//! `any` and the kind's filter parameters.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use catalog_common::types::EntityKind;

use super::commands::{self, CreateEntityCommand, DeleteEntityCommand, UpdateEntityCommand};
use super::queries::{self, EntityExistsQuery, GetEntityQuery, ListEntitiesQuery};
use crate::error::{ApiResult, AppError};
use crate::features::Services;
use crate::listing::{Listing, ListingSpec, Shape};
use crate::store::EntityBody;

type RawQuery = Query<HashMap<String, String>>;

// ============================================================================
// Router Configuration
// ============================================================================

/// Creates the routes of one entity kind
pub fn entity_routes(spec: ListingSpec) -> Router<Services> {
    let kind = spec.kind;
    let spec = Arc::new(spec);
    let collection_path = format!("/{}", kind.collection());
    let item_path = format!("/{}/:id", kind.collection());
    let text_path = format!("/{}", spec.text_path);

    let bodies_spec = Arc::clone(&spec);
    let text_spec = Arc::clone(&spec);

    Router::new()
        .route(
            &collection_path,
            get(move |State(services): State<Services>, Query(params): RawQuery| {
                list_entities(services, Arc::clone(&bodies_spec), Shape::Bodies, params)
            })
            .post(move |State(services): State<Services>, body: Bytes| {
                create_entity(services, kind, body)
            }),
        )
        .route(
            &text_path,
            get(move |State(services): State<Services>, Query(params): RawQuery| {
                list_entities(services, Arc::clone(&text_spec), Shape::TextValues, params)
            }),
        )
        .route(
            &item_path,
            get(move |State(services): State<Services>, Path(id): Path<String>| {
                get_entity(services, kind, id)
            })
            .head(move |State(services): State<Services>, Path(id): Path<String>| {
                entity_exists(services, kind, id)
            })
            .put(
                move |State(services): State<Services>, Path(id): Path<String>, body: Bytes| {
                    update_entity(services, kind, id, body)
                },
            )
            .delete(move |State(services): State<Services>, Path(id): Path<String>| {
                delete_entity(services, kind, id)
            }),
        )
}

/// Parse a request body as JSON. Shape checks belong to the command.
fn parse_json(body: &Bytes) -> Result<EntityBody, AppError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Request body is not valid JSON: {}", e)))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// `201 Created` with the stored body and a `Location` header
async fn create_entity(services: Services, kind: EntityKind, body: Bytes) -> ApiResult<Response> {
    let command = CreateEntityCommand {
        kind,
        body: parse_json(&body)?,
    };
    let created = commands::create::handle(services.store, command).await?;

    let id = created
        .get("id")
        .and_then(|id| id.as_str())
        .unwrap_or_default()
        .to_string();
    tracing::info!(kind = %kind, id = %id, "Entity created via API");

    let location = format!("/api/v1/{}/{}", kind.collection(), id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    )
        .into_response())
}

async fn update_entity(
    services: Services,
    kind: EntityKind,
    id: String,
    body: Bytes,
) -> ApiResult<Json<EntityBody>> {
    let command = UpdateEntityCommand {
        kind,
        id,
        body: parse_json(&body)?,
    };
    let updated = commands::update::handle(services.store, command).await?;

    tracing::info!(kind = %kind, "Entity updated via API");
    Ok(Json(updated))
}

async fn delete_entity(services: Services, kind: EntityKind, id: String) -> ApiResult<StatusCode> {
    commands::delete::handle(services.store, DeleteEntityCommand { kind, id }).await?;

    tracing::info!(kind = %kind, "Entity deleted via API");
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

async fn list_entities(
    services: Services,
    spec: Arc<ListingSpec>,
    shape: Shape,
    params: HashMap<String, String>,
) -> ApiResult<Json<Listing>> {
    let query = ListEntitiesQuery {
        spec,
        shape,
        params,
    };
    let listing = queries::list::handle(services.engine, query).await?;
    Ok(Json(listing))
}

async fn get_entity(services: Services, kind: EntityKind, id: String) -> ApiResult<Json<EntityBody>> {
    let body = queries::get::handle(services.store, GetEntityQuery { kind, id }).await?;
    Ok(Json(body))
}

/// `200` when present, `404` otherwise; never a body
async fn entity_exists(services: Services, kind: EntityKind, id: String) -> ApiResult<StatusCode> {
    let query = EntityExistsQuery {
        kind,
        id: id.clone(),
    };
    if queries::exists::handle(services.store, query).await? {
        Ok(StatusCode::OK)
    } else {
        Err(AppError::NotFound(format!("{} {} not found", kind, id)))
    }
}
