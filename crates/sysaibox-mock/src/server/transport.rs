//! HTTP transport.
//!
//! Routes every endpoint of the mock box onto the shared [`PairingStore`].

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::pairing::{PairingStore, handlers};
use crate::config::Config;

/// Shared state for HTTP handlers.
pub struct HttpState {
    pub store: PairingStore,
    pub config: Config,
}

/// Create the HTTP router for the mock box.
pub fn create_router(store: PairingStore, config: Config) -> Router {
    let state = Arc::new(HttpState { store, config });

    Router::new()
        // Human-facing pages
        .route("/", get(handlers::handle_index))
        .route("/console", get(handlers::handle_console))
        .route("/approve", get(handlers::handle_approve))
        // Info
        .route("/api/v1/health", get(health_check))
        .route("/api/v1/version", get(version_info))
        .route("/ready", get(readiness_check))
        // Device flow
        .route("/api/v1/auth/device/start", post(handlers::handle_device_start))
        .route("/api/v1/auth/device/status", get(handlers::handle_device_status))
        .route("/api/v1/auth/device/token", post(handlers::handle_device_token))
        .route("/api/v1/auth/refresh", post(handlers::handle_refresh))
        .route("/api/v1/auth/revoke", post(handlers::handle_revoke))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": state.config.reported_version
    }))
}

async fn version_info(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "version": state.config.reported_version,
        "build": state.config.build
    }))
}

async fn readiness_check(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ready",
        "service": "sysaibox-mock",
        "version": env!("CARGO_PKG_VERSION"),
        "pairings": state.store.len().await
    }))
}
