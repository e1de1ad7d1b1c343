//! Collection and resource endpoints.
//!
//! Both endpoints dispatch on the verb themselves so that unsupported verbs
//! get the JSON 405 envelope. Preflight never reaches this module.
//!
//! Check order per request: missing or undecodable id (resource only), then
//! backend configuration, then the verb. Body rejections only surface for
//! verbs that read the body.

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, RawQuery, State};
use axum::http::{Method, StatusCode};
use axum::response::Response;
use chrono::Utc;
use serde_json::{json, Map, Value};

use crate::backend::{BackendClient, ListParams, ListQuery};
use crate::http::error::FacadeError;
use crate::http::response::{json_response, no_content};
use crate::http::server::AppState;
use crate::registrations::validation::{parse_body, require_id, validate_create, validate_update};

type HandlerResult = Result<Response, FacadeError>;

/// `/{collection}`: list and create.
pub async fn collection_endpoint(
    State(state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult {
    let backend = state.backend()?;

    match method {
        Method::GET => {
            let params = ListParams::from_query(query.as_deref());
            list(backend, ListQuery::from(params)).await
        }
        Method::POST => create(backend, &body?).await,
        other => Err(FacadeError::MethodNotAllowed(other)),
    }
}

/// `/{collection}/{id}`: fetch, update, delete.
pub async fn resource_endpoint(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult {
    let Path(id) = id?;
    dispatch_resource(&state, Some(&id), method, body).await
}

/// `/{collection}/`: a resource route without an id.
pub async fn missing_id_endpoint(State(state): State<AppState>, method: Method) -> HandlerResult {
    dispatch_resource(&state, None, method, Ok(Bytes::new())).await
}

async fn dispatch_resource(
    state: &AppState,
    id: Option<&str>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult {
    let id = require_id(id)?;
    let backend = state.backend()?;

    match method {
        Method::GET => fetch(backend, id).await,
        Method::PATCH | Method::PUT => update(backend, id, &body?).await,
        Method::DELETE => delete(backend, id).await,
        other => Err(FacadeError::MethodNotAllowed(other)),
    }
}

/// One page plus the total count of matching rows.
pub async fn list(backend: &BackendClient, query: ListQuery) -> HandlerResult {
    tracing::debug!(
        page = query.page,
        limit = query.limit,
        offset = query.offset(),
        search = ?query.search,
        sort = %query.sort,
        "Listing registrations"
    );

    let page = backend.list(&query).await?;
    let body = json!({
        "data": page.rows,
        "total": page.total.value(),
        "page": query.page,
        "limit": query.limit,
        "table": backend.table(),
    });
    Ok(json_response(StatusCode::OK, &body))
}

pub async fn create(backend: &BackendClient, body: &[u8]) -> HandlerResult {
    let body = parse_body(body)?;
    let record = validate_create(&body, Utc::now())?;
    let record = serde_json::to_value(&record).map_err(|e| FacadeError::Internal(e.to_string()))?;

    let created = backend.insert(&record).await?.unwrap_or(Value::Null);
    let created_id = created.get("id").cloned().unwrap_or(Value::Null);
    tracing::info!(id = %created_id, "Registration created");
    Ok(json_response(StatusCode::CREATED, &created))
}

pub async fn fetch(backend: &BackendClient, id: &str) -> HandlerResult {
    let row = backend.fetch(id).await?.ok_or(FacadeError::NotFound)?;
    Ok(json_response(StatusCode::OK, &row))
}

/// PATCH and PUT alike: partial update of whitelisted fields.
pub async fn update(backend: &BackendClient, id: &str, body: &[u8]) -> HandlerResult {
    let body = parse_body(body)?;
    let changes = validate_update(&body)?;

    let updated = match backend.update(id, &changes).await? {
        Some(row) => row,
        None => {
            // Nothing echoed back: answer with what was asked for.
            tracing::debug!(id, "Backend returned no representation, synthesizing result");
            synthesize(id, changes)
        }
    };
    tracing::info!(id, "Registration updated");
    Ok(json_response(StatusCode::OK, &updated))
}

pub async fn delete(backend: &BackendClient, id: &str) -> HandlerResult {
    backend.delete(id).await?;
    tracing::info!(id, "Registration deleted");
    Ok(no_content())
}

fn synthesize(id: &str, changes: Map<String, Value>) -> Value {
    let mut merged = Map::with_capacity(changes.len() + 1);
    merged.insert("id".to_string(), Value::String(id.to_string()));
    merged.extend(changes);
    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesized_result_leads_with_id() {
        let mut changes = Map::new();
        changes.insert("status".into(), json!("done"));
        assert_eq!(synthesize("7", changes), json!({"id": "7", "status": "done"}));
    }
}
