//! HTTP surface: router assembly and the server loop

pub mod response;

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use tokio::signal;
use tokio::sync::Notify;
use tower_http::compression::CompressionLayer;
use tracing::{info, warn};

use crate::audit::{AuditLayer, TracingAuditSink};
use crate::config::Config;
use crate::features::{self, catalog, Services};
use crate::listing::ListingSpec;
use crate::middleware;
use crate::store::MemoryStore;

/// Build the application router with all routes and middleware
///
/// Layers apply innermost first; the audit layer is outermost so it observes
/// the final status of every request.
pub fn create_router(services: Services, specs: Vec<ListingSpec>, config: &Config) -> Router {
    let audit = Arc::clone(&services.audit);
    let api_v1 = features::router(services, specs);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/v1", api_v1)
        .layer(middleware::timeout_layer(config.server.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(middleware::cors_layer(&config.cors))
        .layer(middleware::tracing_layer())
        .layer(AuditLayer::new(audit))
}

/// Run the server until Ctrl+C or SIGTERM
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let specs = catalog::listing_specs();
    let store = Arc::new(MemoryStore::new(&specs));
    let services = Services::new(store, Arc::new(TracingAuditSink), config.listing);
    let app = create_router(services, specs, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    let shutdown = Arc::new(Notify::new());
    let trigger = Arc::clone(&shutdown);
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { trigger.notified().await });
    let mut handle = tokio::spawn(server.into_future());

    tokio::select! {
        result = &mut handle => {
            result??;
            return Ok(());
        },
        _ = shutdown_signal() => {},
    }

    shutdown.notify_one();
    let timeout = config.server.shutdown_timeout();
    info!("Waiting up to {} seconds for connections to close", timeout.as_secs());
    match tokio::time::timeout(timeout, handle).await {
        Ok(result) => result??,
        Err(_) => warn!("Connections still open after shutdown timeout, exiting anyway"),
    }

    info!("Server shut down gracefully");
    Ok(())
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Catalog Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
