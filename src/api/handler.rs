//! HTTP entrypoint - thin router that delegates to specialized handlers.
//!
//! This module handles:
//! - Request validation (signature headers, replay window)
//! - Slack's `url_verification` handshake
//! - Event callbacks (delegated to the `event_handler` module in a spawned task)

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::{event_handler, helpers, parsing, signature};
use crate::bot::SummaryBot;

const HEADER_TIMESTAMP: &str = "x-slack-request-timestamp";
const HEADER_SIGNATURE: &str = "x-slack-signature";
const HEADER_RETRY_NUM: &str = "x-slack-retry-num";

/// Shared state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub signing_secret: Arc<str>,
    pub bot: Arc<SummaryBot>,
}

impl AppState {
    #[must_use]
    pub fn new(signing_secret: &str, bot: Arc<SummaryBot>) -> Self {
        Self {
            signing_secret: Arc::from(signing_secret),
            bot,
        }
    }
}

/// Builds the HTTP router: `GET /health` and `POST /slack/events`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/slack/events", post(slack_events))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Slack Events API endpoint.
///
/// Always answers quickly: event work happens in a spawned task so Slack's
/// three second acknowledgement deadline is never at risk.
#[tracing::instrument(level = "info", skip_all)]
pub async fn slack_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    // ========================================================================
    // Verify Slack signature
    // ========================================================================

    if let Err(response) = verify_signature(&body, &headers, &state.signing_secret) {
        return response;
    }

    // Slack re-sends events it thinks timed out; the first delivery is already being handled.
    if let Some(retry) = parsing::header_value(&headers, HEADER_RETRY_NUM) {
        info!(retry_num = %retry, "Acknowledging Slack retry without reprocessing");
        return helpers::ok_empty();
    }

    let payload: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(e) => {
            error!("Event body is not JSON: {}", e);
            return helpers::err_response(StatusCode::BAD_REQUEST, "Invalid JSON body");
        }
    };

    // ========================================================================
    // Route by payload type
    // ========================================================================

    match parsing::v_str(&payload, &["type"]).unwrap_or_default() {
        "url_verification" => {
            let challenge = parsing::v_str(&payload, &["challenge"]).unwrap_or_default();
            Json(json!({ "challenge": challenge })).into_response()
        }
        "event_callback" => {
            let Some(event) = payload.get("event").cloned() else {
                error!("event_callback without an event");
                return helpers::err_response(StatusCode::BAD_REQUEST, "Missing event");
            };
            let event_id = parsing::v_str(&payload, &["event_id"]).unwrap_or_default();
            info!(event_id = %event_id, event_type = ?parsing::v_str(&event, &["type"]), "Event received");

            tokio::spawn(event_handler::process_event(Arc::clone(&state.bot), event));
            helpers::ok_empty()
        }
        other => {
            info!(payload_type = %other, "Ignoring unsupported payload type");
            helpers::ok_empty()
        }
    }
}

fn verify_signature(body: &str, headers: &HeaderMap, signing_secret: &str) -> Result<(), Response> {
    let timestamp = parsing::header_value(headers, HEADER_TIMESTAMP);
    let signature_header = parsing::header_value(headers, HEADER_SIGNATURE);

    let (Some(timestamp), Some(signature_header)) = (timestamp, signature_header) else {
        error!("Request missing Slack signature headers");
        return Err(helpers::err_response(
            StatusCode::UNAUTHORIZED,
            "Missing Slack signature headers",
        ));
    };

    if signature::verify_slack_signature(body, timestamp, signature_header, signing_secret) {
        Ok(())
    } else {
        Err(helpers::err_response(
            StatusCode::UNAUTHORIZED,
            "Invalid signature",
        ))
    }
}
