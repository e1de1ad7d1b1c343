//! Cross-origin negotiation.
//!
//! Preflight requests are answered here without reaching a handler, so they
//! succeed even when the backend is not configured. Every other response gets
//! the same permissive header set, echoing the caller's `Origin`.

use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, ORIGIN,
};
use axum::http::{HeaderMap, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;

use crate::config::CorsConfig;
use crate::http::response::no_content;

pub const COLLECTION_METHODS: &str = "GET, POST, OPTIONS";
pub const RESOURCE_METHODS: &str = "GET, PATCH, PUT, DELETE, OPTIONS";
const DEFAULT_ALLOW_HEADERS: &str = "Content-Type, Authorization, apikey, Prefer";

/// Header values attached by one endpoint.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
    max_age: HeaderValue,
}

impl CorsPolicy {
    pub fn new(allow_methods: &'static str, config: &CorsConfig) -> Self {
        let allow_headers = HeaderValue::from_str(&config.allow_headers).unwrap_or_else(|_| {
            tracing::warn!(value = %config.allow_headers, "Unusable cors.allow_headers, using default");
            HeaderValue::from_static(DEFAULT_ALLOW_HEADERS)
        });
        Self {
            allow_methods: HeaderValue::from_static(allow_methods),
            allow_headers,
            max_age: HeaderValue::from(config.max_age_secs),
        }
    }

    pub fn collection(config: &CorsConfig) -> Self {
        Self::new(COLLECTION_METHODS, config)
    }

    pub fn resource(config: &CorsConfig) -> Self {
        Self::new(RESOURCE_METHODS, config)
    }

    /// Write the header set, reflecting `origin` or `*`.
    pub fn apply(&self, headers: &mut HeaderMap, origin: Option<HeaderValue>) {
        let origin = origin
            .filter(|o| !o.is_empty())
            .unwrap_or_else(|| HeaderValue::from_static("*"));
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        headers.insert(ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
    }
}

/// Answer OPTIONS with 204 and decorate everything else.
pub async fn cors_middleware(State(policy): State<CorsPolicy>, request: Request, next: Next) -> Response {
    let origin = request.headers().get(ORIGIN).cloned();

    let mut response = if request.method() == Method::OPTIONS {
        tracing::trace!(path = %request.uri().path(), "Preflight answered");
        no_content()
    } else {
        next.run(request).await
    };

    policy.apply(response.headers_mut(), origin);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflects_origin_or_wildcard() {
        let policy = CorsPolicy::collection(&CorsConfig::default());

        let mut headers = HeaderMap::new();
        policy.apply(&mut headers, Some(HeaderValue::from_static("https://app.example")));
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "https://app.example");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], COLLECTION_METHODS);
        assert_eq!(headers[ACCESS_CONTROL_MAX_AGE], "86400");

        let mut headers = HeaderMap::new();
        policy.apply(&mut headers, Some(HeaderValue::from_static("")));
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[test]
    fn bad_allow_headers_fall_back() {
        let config = CorsConfig {
            allow_headers: "Content-Type\n".into(),
            ..CorsConfig::default()
        };
        let policy = CorsPolicy::resource(&config);
        let mut headers = HeaderMap::new();
        policy.apply(&mut headers, None);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], DEFAULT_ALLOW_HEADERS);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], RESOURCE_METHODS);
    }
}
