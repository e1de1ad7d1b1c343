//! Configuration validation.
//!
//! Serde handles syntax; this checks values. All problems are reported at
//! once rather than stopping at the first one.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::FacadeConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("listener.collection_path '{0}' must start with '/' and not end with '/'")]
    CollectionPath(String),

    #[error("backend.base_url '{0}' is not an absolute http(s) URL")]
    BaseUrl(String),

    #[error("backend.table must not be empty")]
    EmptyTable,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &FacadeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let path = &config.listener.collection_path;
    if !path.starts_with('/') || path.len() < 2 || path.ends_with('/') {
        errors.push(ValidationError::CollectionPath(path.clone()));
    }

    if let Some(base) = config.backend.base_url.as_deref().filter(|s| !s.is_empty()) {
        let valid = url::Url::parse(base)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::BaseUrl(base.to_string()));
        }
    }

    if config.backend.table.trim().is_empty() {
        errors.push(ValidationError::EmptyTable);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
