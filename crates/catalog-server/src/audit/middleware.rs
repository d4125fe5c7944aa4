//! Audit middleware
//!
//! Records one event for every command (POST, PUT, PATCH, DELETE), whatever
//! its outcome, and for every 5xx response of any method. Queries that
//! succeed or fail with a client error are not audited.
//!
//! Recording is spawned after the response is produced; a failing sink is
//! logged and otherwise ignored.

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, Request},
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use catalog_common::types::{EntityId, EntityKind};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde_json::Value as JsonValue;
use std::{
    future::Future,
    net::SocketAddr,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::{debug, error, warn};

use super::models::{AuditAction, AuditEvent};
use super::sink::AuditSink;
use crate::api::response::ErrorResponse;
use crate::error::AuditCause;

/// Largest command body buffered for the audit record; matches axum's
/// default extractor limit.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Audit logging layer
#[derive(Clone)]
pub struct AuditLayer {
    sink: Arc<dyn AuditSink>,
    max_body_bytes: usize,
}

impl AuditLayer {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self {
            sink,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Override the command body cap. Larger bodies are answered with 413.
    pub fn with_body_limit(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

impl<S> Layer<S> for AuditLayer {
    type Service = AuditMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuditMiddleware {
            inner,
            sink: Arc::clone(&self.sink),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

/// Audit middleware service
#[derive(Clone)]
pub struct AuditMiddleware<S> {
    inner: S,
    sink: Arc<dyn AuditSink>,
    max_body_bytes: usize,
}

impl<S> Service<Request> for AuditMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let mut inner = self.inner.clone();
        let sink = Arc::clone(&self.sink);
        let max_body_bytes = self.max_body_bytes;

        Box::pin(async move {
            let method = request.method().clone();
            let uri = request.uri().clone();

            let ip_address = request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip().to_string());
            let user_agent = header_text(&request, header::USER_AGENT.as_str());
            let user_id = header_text(&request, "x-user-id");

            let is_command = is_command(&method);

            // Commands have their body buffered so it can be recorded as the change set.
            let (response, body_bytes) = if is_command {
                let (parts, body) = request.into_parts();
                match Limited::new(body, max_body_bytes).collect().await {
                    Ok(collected) => {
                        let bytes = collected.to_bytes();
                        let request = Request::from_parts(parts, Body::from(bytes.clone()));
                        (inner.call(request).await?, bytes)
                    },
                    Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
                        warn!(method = %method, uri = %uri, limit = max_body_bytes, "Request body too large");
                        (payload_too_large(max_body_bytes), Bytes::new())
                    },
                    Err(e) => {
                        warn!(method = %method, uri = %uri, error = %e, "Failed to capture request body");
                        let request = Request::from_parts(parts, Body::empty());
                        (inner.call(request).await?, Bytes::new())
                    },
                }
            } else {
                (inner.call(request).await?, Bytes::new())
            };
            let status = response.status();

            if !is_command && !status.is_server_error() {
                return Ok(response);
            }

            let (kind, path_id) = infer_resource(&uri);
            let resource_id = path_id.or_else(|| created_id(&response));
            let changes = if body_bytes.is_empty() {
                None
            } else {
                serde_json::from_slice::<JsonValue>(&body_bytes).ok()
            };
            let cause = response
                .extensions()
                .get::<AuditCause>()
                .map(|cause| cause.0.clone());

            let event = AuditEvent::builder()
                .action(infer_action(&method))
                .status(status.as_u16())
                .resource(kind, resource_id)
                .request(method.as_str(), uri.to_string())
                .changes(changes)
                .cause(cause)
                .user_id(user_id)
                .ip_address(ip_address)
                .user_agent(user_agent)
                .try_build();

            match event {
                Ok(event) => {
                    debug!(method = %method, uri = %uri, status = %status, "Recording audit event");
                    tokio::spawn(async move {
                        if let Err(e) = sink.record(event).await {
                            error!(error = %e, "Failed to record audit event");
                        }
                    });
                },
                Err(e) => error!(error = e, "Failed to build audit event"),
            }

            Ok(response)
        })
    }
}

fn payload_too_large(limit: usize) -> Response {
    let body = ErrorResponse::new(
        "PAYLOAD_TOO_LARGE",
        format!("Request body exceeds {} bytes", limit),
    );
    (StatusCode::PAYLOAD_TOO_LARGE, Json(body)).into_response()
}

fn header_text(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn is_command(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}

fn infer_action(method: &Method) -> AuditAction {
    match *method {
        Method::POST => AuditAction::Create,
        Method::PUT | Method::PATCH => AuditAction::Update,
        Method::DELETE => AuditAction::Delete,
        Method::GET | Method::HEAD => AuditAction::Read,
        _ => AuditAction::Other,
    }
}

/// Infer entity kind and id from the request path.
///
/// Both collection paths (`/users`) and text listing paths (`/user_names`)
/// resolve to their kind.
fn infer_resource(uri: &Uri) -> (Option<EntityKind>, Option<EntityId>) {
    let segments: Vec<&str> = uri.path().split('/').filter(|s| !s.is_empty()).collect();

    let kind = segments.iter().find_map(|segment| {
        EntityKind::from_collection(segment).or_else(|| {
            EntityKind::ALL.into_iter().find(|kind| {
                segment
                    .strip_prefix(kind.as_str())
                    .is_some_and(|rest| rest.starts_with('_'))
            })
        })
    });
    let id = segments
        .iter()
        .find_map(|segment| EntityId::parse(segment).ok());

    (kind, id)
}

/// Id of a newly created entity, from the `Location` header.
fn created_id(response: &Response) -> Option<EntityId> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|location| location.rsplit('/').next())
        .and_then(|segment| EntityId::parse(segment).ok())
}
