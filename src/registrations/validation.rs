//! Input validation and sanitization for writes.
//!
//! Every check here runs before the backend is contacted.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::registrations::model::{
    NewRegistration, Status, TextField, ADDRESS, NOTE, PHONE, STORE_NAME, UPDATABLE_FIELDS,
};

/// Client input rejected before any backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Invalid JSON body")]
    InvalidJson,

    #[error("Missing required fields: store_name, address, phone")]
    MissingFields,

    #[error("Missing record id")]
    MissingId,

    #[error("No updatable fields provided")]
    NoUpdatableFields,

    #[error("Invalid status value")]
    InvalidStatus,

    #[error("Invalid value for {0}")]
    InvalidField(&'static str),
}

/// Parse a request body as JSON.
pub fn parse_body(bytes: &[u8]) -> Result<Value, InputError> {
    serde_json::from_slice(bytes).map_err(|_| InputError::InvalidJson)
}

/// Reject an empty path identifier.
pub fn require_id(id: Option<&str>) -> Result<&str, InputError> {
    id.filter(|id| !id.is_empty()).ok_or(InputError::MissingId)
}

/// Build the sanitized row for a create request.
pub fn validate_create(body: &Value, now: DateTime<Utc>) -> Result<NewRegistration, InputError> {
    let field = |name: &str| body.get(name).filter(|v| is_truthy(v));

    let (Some(store_name), Some(address), Some(phone)) =
        (field(STORE_NAME.name), field(ADDRESS.name), field(PHONE.name))
    else {
        return Err(InputError::MissingFields);
    };

    let note = field(NOTE.name)
        .map(|v| sanitize(v, NOTE))
        .filter(|s| !s.is_empty());

    let submitted_at = field("submitted_at")
        .cloned()
        .unwrap_or_else(|| Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)));

    Ok(NewRegistration {
        store_name: sanitize(store_name, STORE_NAME),
        address: sanitize(address, ADDRESS),
        phone: sanitize(phone, PHONE),
        note,
        // Clients never choose the initial state.
        status: Status::New,
        submitted_at,
    })
}

/// Build the change set for a partial update from whitelisted keys only.
pub fn validate_update(body: &Value) -> Result<Map<String, Value>, InputError> {
    let mut changes = Map::new();
    let Some(object) = body.as_object() else {
        return Err(InputError::NoUpdatableFields);
    };

    for name in UPDATABLE_FIELDS {
        let Some(value) = object.get(name) else {
            continue;
        };
        let sanitized = match name {
            "status" => {
                let status = value
                    .as_str()
                    .and_then(|s| s.parse::<Status>().ok())
                    .ok_or(InputError::InvalidStatus)?;
                Value::String(status.as_str().to_string())
            }
            "note" => {
                if is_truthy(value) {
                    let text = sanitize(value, NOTE);
                    if text.is_empty() { Value::Null } else { Value::String(text) }
                } else {
                    Value::Null
                }
            }
            _ => {
                let field = required_field(name);
                let text = if is_truthy(value) { sanitize(value, field) } else { String::new() };
                if text.is_empty() {
                    return Err(InputError::InvalidField(field.name));
                }
                Value::String(text)
            }
        };
        changes.insert(name.to_string(), sanitized);
    }

    if changes.is_empty() {
        return Err(InputError::NoUpdatableFields);
    }
    Ok(changes)
}

fn required_field(name: &str) -> TextField {
    match name {
        "store_name" => STORE_NAME,
        "address" => ADDRESS,
        _ => PHONE,
    }
}

/// JSON truthiness: null, false, zero and the empty string are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render as text, trim, and cap at the field's character limit.
pub fn sanitize(value: &Value, field: TextField) -> String {
    let rendered = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    rendered.trim().chars().take(field.max_chars).collect()
}
