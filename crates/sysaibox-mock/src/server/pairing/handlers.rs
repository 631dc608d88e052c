//! Device flow endpoint handlers.
//!
//! Each handler makes exactly one [`PairingStore`](super::PairingStore) call
//! and formats the result as JSON or HTML.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use super::pages;
use super::types::TokenPair;
use crate::error::PairingError;
use crate::server::transport::HttpState;

// ─── Device Authorization ────────────────────────────────────────────────────

/// `POST /api/v1/auth/device/start`
pub async fn handle_device_start(State(state): State<Arc<HttpState>>) -> Response {
    let grant = match state.store.start_pairing().await {
        Ok(grant) => grant,
        Err(e) => return pairing_error(&e),
    };

    Json(serde_json::json!({
        "device_code": grant.device_code,
        "user_code": grant.user_code,
        "verification_uri": state.config.verification_uri(),
        "expires_in": grant.expires_in,
        "interval": grant.interval
    }))
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub device_code: Option<String>,
}

/// `GET /api/v1/auth/device/status?device_code=…`
pub async fn handle_device_status(
    State(state): State<Arc<HttpState>>,
    Query(query): Query<StatusQuery>,
) -> impl IntoResponse {
    let status = state.store.status(query.device_code.as_deref().unwrap_or_default()).await;

    Json(serde_json::json!({ "status": status }))
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenRequest {
    pub device_code: Option<String>,
}

/// `POST /api/v1/auth/device/token`
///
/// A missing or unparseable body is read as `{}` and rejected as not
/// authorized, like any other unknown device code.
pub async fn handle_device_token(State(state): State<Arc<HttpState>>, body: Bytes) -> Response {
    let req: TokenRequest = serde_json::from_slice(&body).unwrap_or_default();
    let Some(device_code) = req.device_code else {
        return pairing_error(&PairingError::NotAuthorized);
    };

    match state.store.redeem(&device_code).await {
        Ok(pair) => token_success(&pair),
        Err(e) => pairing_error(&e),
    }
}

// ─── Token Maintenance ───────────────────────────────────────────────────────

/// `POST /api/v1/auth/refresh`
///
/// Always issues a new pair; the request body is ignored.
pub async fn handle_refresh(State(state): State<Arc<HttpState>>) -> Response {
    token_success(&state.store.refresh())
}

/// `POST /api/v1/auth/revoke`
pub async fn handle_revoke(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(serde_json::json!({ "success": state.store.revoke() }))
}

// ─── Console ─────────────────────────────────────────────────────────────────

/// `GET /`
pub async fn handle_index(State(state): State<Arc<HttpState>>) -> Html<String> {
    let active = state.store.active_pairings().await;
    Html(pages::render_index(&active, state.config.poll_interval.as_secs()))
}

/// `GET /console`
pub async fn handle_console() -> Html<String> {
    Html(pages::render_console())
}

#[derive(Debug, Deserialize)]
pub struct ApproveQuery {
    pub code: Option<String>,
}

/// `GET /approve?code=…`
pub async fn handle_approve(
    State(state): State<Arc<HttpState>>,
    Query(query): Query<ApproveQuery>,
) -> Response {
    let code = query.code.unwrap_or_default();

    match state.store.approve(&code).await {
        Ok(outcome) => {
            Html(pages::render_approved(&code.trim().to_ascii_uppercase(), outcome)).into_response()
        }
        Err(PairingError::NotFound { code }) => {
            (StatusCode::NOT_FOUND, Html(pages::render_not_found(&code))).into_response()
        }
        Err(e) => pairing_error(&e),
    }
}

/// Build a token response with no-store cache headers.
fn token_success(pair: &TokenPair) -> Response {
    let mut response = Json(serde_json::json!({
        "access_token": pair.access_token,
        "refresh_token": pair.refresh_token,
        "expires_in": pair.expires_in
    }))
    .into_response();

    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    response
}

fn pairing_error(err: &PairingError) -> Response {
    let status = match err {
        PairingError::CodeSpaceExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
        PairingError::NotFound { .. } | PairingError::NotAuthorized => StatusCode::BAD_REQUEST,
    };
    (status, Json(serde_json::json!({ "error": err.error_code() }))).into_response()
}
