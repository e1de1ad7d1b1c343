//! Response shaping.
//!
//! # Responsibilities
//! - Serialize JSON bodies with an explicit UTF-8 content type
//! - Build the `{ error, detail }` envelope
//! - Produce bodiless 204 responses
//!
//! # Design Decisions
//! - CORS headers are not added here; the negotiator middleware owns them

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Serialize `body` with the given status.
pub fn json_response(status: StatusCode, body: &Value) -> Response {
    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8));
    response
}

/// `{ "error": message }`, plus `detail` when given.
pub fn error_response(status: StatusCode, message: &str, detail: Option<&str>) -> Response {
    let body = match detail {
        Some(detail) => json!({ "error": message, "detail": detail }),
        None => json!({ "error": message }),
    };
    json_response(status, &body)
}

/// Empty 204.
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
