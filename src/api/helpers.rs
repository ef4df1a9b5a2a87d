//! Response builders shared by the HTTP handlers.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Returns a 200 OK response with an empty JSON body.
#[must_use]
pub fn ok_empty() -> Response {
    (StatusCode::OK, Json(json!({}))).into_response()
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
