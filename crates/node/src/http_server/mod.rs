use std::iter::once;

use axum::extract::DefaultBodyLimit;
use axum::{Extension, Router};
use http::HeaderName;
use tokio::sync::watch;
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse};
use tower_http::LatencyUnit;

pub mod api;
mod config;
mod handlers;
mod health;

pub use config::Config;

use crate::ServiceState;

const API_PREFIX: &str = "/api";
const STATUS_PREFIX: &str = "/_status";

/// Headers that carry pool keys
pub const MASTER_KEY_HEADER: &str = "x-master-key";
pub const WRITER_KEY_HEADER: &str = "x-writer-key";
pub const READER_KEY_HEADER: &str = "x-reader-key";

/// Maximum request body size in bytes (1 MB)
pub const MAX_BODY_SIZE_BYTES: usize = 1024 * 1024;

/// Status and API routes over `state`, without tracing or server config
pub fn router(state: ServiceState) -> Router {
    let key_headers = [MASTER_KEY_HEADER, WRITER_KEY_HEADER, READER_KEY_HEADER]
        .into_iter()
        .map(HeaderName::from_static)
        .chain(once(http::header::AUTHORIZATION))
        .collect::<Vec<_>>();

    Router::new()
        .nest(STATUS_PREFIX, health::router(state.clone()))
        .nest(API_PREFIX, api::router(state.clone()))
        .fallback(handlers::not_found_handler)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE_BYTES))
        .layer(SetSensitiveRequestHeadersLayer::new(key_headers))
        .with_state(state)
}

/// Run the API HTTP server (serves /_status + /api routes).
pub async fn run_api(
    config: Config,
    state: ServiceState,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    let listen_addr = config.listen_addr;
    let log_level = config.log_level;
    let trace_layer = TraceLayer::new_for_http()
        .on_response(
            DefaultOnResponse::new()
                .include_headers(false)
                .level(log_level)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    let router = router(state)
        .layer(Extension(config.clone()))
        .layer(trace_layer);

    tracing::info!(addr = ?listen_addr, "API server listening");
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("an error occurred running the HTTP server: {0}")]
    ServingFailed(#[from] std::io::Error),
}
