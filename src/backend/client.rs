//! REST client for the remote data service.
//!
//! # Responsibilities
//! - Build authenticated requests against `<base>/rest/v1/<table>`
//! - Ask for the representation of written rows
//! - Run the page fetch and the count probe of a list concurrently
//! - Turn non-success statuses into [`BackendError::Status`] with the raw body
//!
//! # Design Decisions
//! - No timeouts and no retries: a failure is surfaced exactly once
//! - Status codes are relayed, never reinterpreted

use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_RANGE, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::{Map, Value};

use crate::backend::query::{ListQuery, TotalCount};
use crate::backend::{BackendError, BackendResult};
use crate::observability::metrics;

const APIKEY: HeaderName = HeaderName::from_static("apikey");
const PREFER: HeaderName = HeaderName::from_static("prefer");
const RANGE_UNIT: HeaderName = HeaderName::from_static("range-unit");
const RANGE: HeaderName = HeaderName::from_static("range");

const RETURN_REPRESENTATION: &str = "return=representation";

/// One page of rows together with the total matching count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub rows: Vec<Value>,
    pub total: TotalCount,
}

/// Authenticated client bound to one table.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    endpoint: String,
    table: String,
}

impl BackendClient {
    /// Create a client for `table` at `base_url`, authenticating with `api_key`.
    pub fn new(base_url: &str, api_key: &str, table: &str, use_system_proxy: bool) -> BackendResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(APIKEY, header_value(api_key)?);
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {api_key}"))?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(PREFER, HeaderValue::from_static(RETURN_REPRESENTATION));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if !use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder
            .build()
            .map_err(BackendError::Transport)?;

        let endpoint = format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table);
        tracing::debug!(endpoint = %endpoint, "Backend client initialized");

        Ok(Self {
            http,
            endpoint,
            table: table.to_string(),
        })
    }

    /// Table name as exposed in list responses.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Fetch a page and the total count in parallel.
    ///
    /// A failed page fetch wins over whatever the count probe returned. The
    /// probe's status is not inspected: only its `Content-Range` matters.
    pub async fn list(&self, query: &ListQuery) -> BackendResult<Page> {
        let page_req = self
            .http
            .get(&self.endpoint)
            .query(&query.page_params());
        let count_req = self
            .http
            .head(&self.endpoint)
            .query(&query.count_params())
            .header(PREFER, "count=exact")
            .header(RANGE_UNIT, "items")
            .header(RANGE, "0-0");

        let (page_res, count_res) = tokio::join!(
            self.execute("select", page_req),
            self.send("count", count_req),
        );

        let rows: Vec<Value> = decode(page_res?).await?;
        let count_res = count_res?;
        let content_range = count_res
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok());

        let total = TotalCount::resolve(content_range, rows.len());
        if let TotalCount::PageLength(n) = total {
            tracing::warn!(
                content_range = ?content_range,
                count_status = %count_res.status(),
                total = n,
                "Count metadata unavailable, reporting page length as total"
            );
        }

        Ok(Page { rows, total })
    }

    /// Fetch a single row by id. `None` when nothing matched.
    pub async fn fetch(&self, id: &str) -> BackendResult<Option<Value>> {
        let req = self.http.get(&self.endpoint).query(&id_filter(id));
        let res = self.execute("fetch", req).await?;
        Ok(first_row(decode(res).await?))
    }

    /// Insert one row and return its representation.
    pub async fn insert(&self, record: &Value) -> BackendResult<Option<Value>> {
        let req = self.http.post(&self.endpoint).json(record);
        let res = self.execute("insert", req).await?;
        Ok(first_row(decode(res).await?))
    }

    /// Apply a partial update and return the updated representation, if any.
    pub async fn update(&self, id: &str, changes: &Map<String, Value>) -> BackendResult<Option<Value>> {
        let req = self
            .http
            .patch(&self.endpoint)
            .query(&id_filter(id))
            .json(changes);
        let res = self.execute("update", req).await?;
        let body = res.bytes().await.map_err(BackendError::Transport)?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let value: Value =
            serde_json::from_slice(&body).map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(first_row(value))
    }

    /// Delete rows matching id. Deleting nothing is still a success.
    pub async fn delete(&self, id: &str) -> BackendResult<()> {
        let req = self.http.delete(&self.endpoint).query(&id_filter(id));
        self.execute("delete", req).await?;
        Ok(())
    }

    /// Send and require a success status.
    async fn execute(&self, op: &'static str, req: RequestBuilder) -> BackendResult<Response> {
        let res = self.send(op, req).await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let detail = res.text().await.map_err(BackendError::Transport)?;
        tracing::warn!(op, status = %status, detail = %detail, "Backend returned an error");
        Err(BackendError::Status { status, detail })
    }

    /// Send without judging the status.
    async fn send(&self, op: &'static str, req: RequestBuilder) -> BackendResult<Response> {
        let started = Instant::now();
        match req.send().await {
            Ok(res) => {
                metrics::record_backend_call(op, res.status().as_u16(), started);
                tracing::debug!(op, status = %res.status(), elapsed = ?started.elapsed(), "Backend call finished");
                Ok(res)
            }
            Err(e) => {
                metrics::record_backend_call(op, StatusCode::BAD_GATEWAY.as_u16(), started);
                tracing::error!(op, error = %e, "Backend call failed");
                Err(BackendError::Transport(e))
            }
        }
    }
}

fn header_value(value: &str) -> BackendResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| BackendError::InvalidHeader)
}

fn id_filter(id: &str) -> [(&'static str, String); 1] {
    [("id", format!("eq.{id}"))]
}

async fn decode<T: serde::de::DeserializeOwned>(res: Response) -> BackendResult<T> {
    let body = res.bytes().await.map_err(BackendError::Transport)?;
    serde_json::from_slice(&body).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Representations come back as arrays; some deployments return a bare object.
pub fn first_row(value: Value) -> Option<Value> {
    match value {
        Value::Array(rows) => rows.into_iter().next(),
        Value::Null => None,
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_row_unwraps_arrays() {
        assert_eq!(first_row(json!([{"id": 1}, {"id": 2}])), Some(json!({"id": 1})));
        assert_eq!(first_row(json!([])), None);
        assert_eq!(first_row(Value::Null), None);
        assert_eq!(first_row(json!({"id": 3})), Some(json!({"id": 3})));
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let client = BackendClient::new("https://abc.supabase.co/", "key", "registrations", false).unwrap();
        assert_eq!(client.endpoint, "https://abc.supabase.co/rest/v1/registrations");
        assert_eq!(client.table(), "registrations");
    }

    #[test]
    fn rejects_keys_that_cannot_be_headers() {
        let err = BackendClient::new("https://abc.supabase.co", "bad\nkey", "registrations", false).unwrap_err();
        assert!(matches!(err, BackendError::InvalidHeader));
    }

    #[test]
    fn id_filter_uses_equality() {
        assert_eq!(id_filter("42"), [("id", "eq.42".to_string())]);
    }
}
