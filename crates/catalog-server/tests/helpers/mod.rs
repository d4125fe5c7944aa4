//! Test helpers for catalog server integration tests
//!
//! Builds the real router over an in-memory store and an in-memory audit
//! sink, and wraps `tower::ServiceExt::oneshot` in small request helpers.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use catalog_server::{
    api::create_router,
    audit::{AuditEvent, MemoryAuditSink},
    config::Config,
    features::{catalog::listing_specs, Services},
    listing::ListingSettings,
    store::MemoryStore,
};
use serde_json::Value;
use tower::ServiceExt;

/// Decoded response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// `Value::Null` when the body is empty or not JSON
    pub body: Value,
}

impl TestResponse {
    /// `value` fields of a text listing, in response order
    pub fn values(&self) -> Vec<String> {
        self.body
            .as_array()
            .expect("response is not an array")
            .iter()
            .map(|item| item["value"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    /// `id` fields of a listing, in response order
    pub fn ids(&self) -> Vec<String> {
        self.body
            .as_array()
            .expect("response is not an array")
            .iter()
            .map(|item| item["id"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn error_code(&self) -> &str {
        self.body["error"]["code"].as_str().unwrap_or_default()
    }

    pub fn error_parameter(&self) -> &str {
        self.body["error"]["details"]["parameter"]
            .as_str()
            .unwrap_or_default()
    }
}

/// Router plus handles on its in-memory collaborators
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub audit: Arc<MemoryAuditSink>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_settings(ListingSettings::default())
    }

    pub fn with_settings(settings: ListingSettings) -> Self {
        let specs = listing_specs();
        let store = Arc::new(MemoryStore::new(&specs));
        let audit = Arc::new(MemoryAuditSink::new());
        let services = Services::new(store.clone(), audit.clone(), settings);

        let mut config = Config::default();
        config.listing = settings;
        let router = create_router(services, specs, &config);

        Self {
            router,
            store,
            audit,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let request = builder
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn head(&self, uri: &str) -> TestResponse {
        self.request(Method::HEAD, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body.to_string())).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create an entity through the API and return its id
    pub async fn create(&self, collection: &str, body: Value) -> String {
        let response = self.post(&format!("/api/v1/{}", collection), body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["id"].as_str().unwrap().to_string()
    }

    /// Wait until at least `count` audit events were recorded
    pub async fn audit_events(&self, count: usize) -> Vec<AuditEvent> {
        for _ in 0..100 {
            if self.audit.len().await >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.audit.events().await
    }
}
