//! Single-entity API integration tests

use axum::http::{header, StatusCode};
use catalog_common::types::EntityId;
use serde_json::json;

mod helpers;

use helpers::TestApp;

#[tokio::test]
async fn test_health_and_root() {
    let app = TestApp::new();

    let health = app.get("/health").await;
    assert_eq!(health.status, StatusCode::OK);

    let root = app.get("/").await;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(root.body["name"], "Catalog Server");
}

#[tokio::test]
async fn test_create_returns_body_and_location() {
    let app = TestApp::new();

    let response = app
        .post("/api/v1/organizations", json!({"name": "Acme", "status": "ACTIVE"}))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["name"], "Acme");
    assert_eq!(response.body["version"], 1);

    let id = response.body["id"].as_str().unwrap();
    assert!(EntityId::parse(id).is_ok());
    assert_eq!(
        response.headers[header::LOCATION],
        format!("/api/v1/organizations/{}", id).as_str()
    );
}

#[tokio::test]
async fn test_get_and_head() {
    let app = TestApp::new();
    let id = app.create("tokens", json!({"label": "ci", "status": "ACTIVE"})).await;

    let response = app.get(&format!("/api/v1/tokens/{}", id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["label"], "ci");

    let head = app.head(&format!("/api/v1/tokens/{}", id)).await;
    assert_eq!(head.status, StatusCode::OK);

    let missing = EntityId::generate();
    let head = app.head(&format!("/api/v1/tokens/{}", missing)).await;
    assert_eq!(head.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ids_are_case_insensitive_in_paths() {
    let app = TestApp::new();
    let id = app.create("devices", json!({"name": "laptop"})).await;

    let response = app
        .get(&format!("/api/v1/devices/{}", id.to_uppercase()))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], id.as_str());
}

#[tokio::test]
async fn test_update_replaces_and_reindexes() {
    let app = TestApp::new();
    let id = app
        .create("users", json!({"name": "Ada", "role": "VIEWER", "status": "INVITED"}))
        .await;

    let response = app
        .put(
            &format!("/api/v1/users/{}", id),
            json!({"name": "Ada Lovelace", "role": "ADMIN", "status": "ACTIVE"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["version"], 2);
    assert_eq!(response.body["id"], id.as_str());

    let admins = app.get("/api/v1/user_names?role=ADMIN").await;
    assert_eq!(admins.values(), ["Ada Lovelace"]);
    let viewers = app.get("/api/v1/user_names?role=VIEWER").await;
    assert_eq!(viewers.body, json!([]));
}

#[tokio::test]
async fn test_delete_then_not_found() {
    let app = TestApp::new();
    let id = app.create("emails", json!({"subject": "Hi", "status": "QUEUED"})).await;
    let uri = format!("/api/v1/emails/{}", id);

    let response = app.delete(&uri).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app.get(&uri).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");

    let response = app.delete(&uri).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let listing = app.get("/api/v1/email_subjects?status=QUEUED").await;
    assert_eq!(listing.body, json!([]));
}

#[tokio::test]
async fn test_update_of_missing_entity_is_not_found() {
    let app = TestApp::new();

    let response = app
        .put(
            &format!("/api/v1/events/{}", EntityId::generate()),
            json!({"summary": "ghost"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_path_id_is_rejected_before_store_access() {
    let app = TestApp::new();
    app.store.fail_all("store offline").await;

    for response in [
        app.get("/api/v1/content/42").await,
        app.put("/api/v1/content/42", json!({"title": "x"})).await,
        app.delete("/api/v1/content/42").await,
    ] {
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_parameter(), "id");
    }
}

#[tokio::test]
async fn test_body_must_be_a_json_object() {
    let app = TestApp::new();

    let response = app.post("/api/v1/metrics", json!([1, 2, 3])).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "BAD_REQUEST");

    let response = app
        .request(
            axum::http::Method::POST,
            "/api/v1/metrics",
            Some("{not json".to_string()),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_collection_is_not_found() {
    let app = TestApp::new();

    let response = app.get("/api/v1/widgets").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
