//! Webhook endpoint handlers.
//!
//! The callback handler does exactly three things:
//! 1. Verifies the `X-Line-Signature` over the raw body
//! 2. Hands the verified body to the event dispatcher
//! 3. Returns 200 OK
//!
//! Dispatch failures never reach the inbound response; the platform has
//! already been acknowledged once the signature checks out.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::dispatch::dispatch_webhook;
use crate::line::LineClient;
use crate::web::signature::verify_line_signature;
use crate::Config;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "X-Line-Signature";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub line: LineClient,
}

impl AppState {
    pub fn new(config: Config, line: LineClient) -> Self {
        Self {
            config: Arc::new(config),
            line,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// LINE Callback
// =============================================================================

/// LINE webhook callback endpoint.
///
/// Returns 400 with "Invalid signature" when the signature header is
/// missing or does not match; 200 "OK" otherwise, regardless of what the
/// dispatcher does with the payload.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    info!(
        body = %String::from_utf8_lossy(&body),
        signature = %signature,
        "callback_received"
    );

    let channel_secret = state.config.channel_secret.as_deref().unwrap_or("");

    if !verify_line_signature(channel_secret, &body, signature) {
        warn!("callback_signature_invalid");
        return (StatusCode::BAD_REQUEST, "Invalid signature");
    }

    let outcome = dispatch_webhook(&state.line, &body).await;

    info!(
        replied = outcome.replied,
        failed = outcome.failed,
        ignored = outcome.ignored,
        "callback_handled"
    );

    (StatusCode::OK, "OK")
}
