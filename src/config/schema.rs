//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the facade.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the registrations facade.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FacadeConfig {
    /// Listener configuration (bind address, public path).
    pub listener: ListenerConfig,

    /// Remote REST data service settings.
    pub backend: BackendConfig,

    /// Cross-origin response headers.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Path of the collection endpoint. Single records live under `{path}/{id}`.
    pub collection_path: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            collection_path: "/api/registrations".to_string(),
        }
    }
}

/// Remote data service configuration.
///
/// `base_url` and `api_key` are optional here: a facade started without them
/// still answers preflight requests and reports every other request as
/// misconfigured.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub base_url: Option<String>,

    /// Key sent as both `apikey` and bearer token.
    pub api_key: Option<String>,

    /// Table the facade exposes.
    pub table: String,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` for backend calls.
    pub use_system_proxy: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            table: "registrations".to_string(),
            use_system_proxy: true,
        }
    }
}

impl BackendConfig {
    /// Credentials if both settings are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let url = self.base_url.as_deref().filter(|s| !s.is_empty())?;
        let key = self.api_key.as_deref().filter(|s| !s.is_empty())?;
        Some((url, key))
    }
}

/// CORS header configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Value of `Access-Control-Allow-Headers`.
    pub allow_headers: String,

    /// Preflight cache lifetime in seconds.
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_headers: "Content-Type, Authorization, apikey, Prefer".to_string(),
            max_age_secs: 86_400,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Compact,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: FacadeConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.collection_path, "/api/registrations");
        assert_eq!(config.backend.table, "registrations");
        assert_eq!(config.cors.max_age_secs, 86_400);
        assert!(config.backend.credentials().is_none());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: FacadeConfig = toml::from_str(
            r#"
            [backend]
            base_url = "https://abc.supabase.co"
            api_key = "anon"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.backend.credentials(),
            Some(("https://abc.supabase.co", "anon"))
        );
        assert_eq!(config.backend.table, "registrations");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn blank_credentials_count_as_missing() {
        let backend = BackendConfig {
            base_url: Some("https://abc.supabase.co".into()),
            api_key: Some(String::new()),
            ..BackendConfig::default()
        };
        assert!(backend.credentials().is_none());
    }
}
