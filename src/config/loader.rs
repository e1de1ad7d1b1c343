//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::FacadeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `backend.base_url`.
pub const ENV_BASE_URL: &str = "SUPABASE_URL";
/// Environment variable overriding `backend.api_key`.
pub const ENV_API_KEY: &str = "SUPABASE_ANON_KEY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file (or defaults when `path` is `None`), apply environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<FacadeConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => FacadeConfig::default(),
    };

    finish(config, |name| std::env::var(name).ok())
}

/// Parse a TOML document without touching the filesystem or environment.
pub fn parse_config(content: &str) -> Result<FacadeConfig, ConfigError> {
    let config: FacadeConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn finish(
    mut config: FacadeConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<FacadeConfig, ConfigError> {
    apply_env_overrides(&mut config, env);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Non-empty environment values replace the file's backend credentials.
pub fn apply_env_overrides(config: &mut FacadeConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(url) = env(ENV_BASE_URL).filter(|v| !v.is_empty()) {
        config.backend.base_url = Some(url);
    }
    if let Some(key) = env(ENV_API_KEY).filter(|v| !v.is_empty()) {
        config.backend.api_key = Some(key);
    }
}
