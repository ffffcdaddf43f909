//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `lookup.api_token`.
pub const ENV_LOOKUP_TOKEN: &str = "ARTIFACT_PROXY_LOOKUP_TOKEN";

/// Environment variable overriding `storage.authorization`.
pub const ENV_STORAGE_AUTHORIZATION: &str = "ARTIFACT_PROXY_STORAGE_AUTHORIZATION";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// Secrets may be supplied via the environment instead of the file; an
/// environment value always wins over the file value.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: ProxyConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment-variable overrides for secret values.
pub fn apply_env_overrides(config: &mut ProxyConfig) {
    if let Ok(token) = std::env::var(ENV_LOOKUP_TOKEN) {
        config.lookup.api_token = token;
    }
    if let Ok(auth) = std::env::var(ENV_STORAGE_AUTHORIZATION) {
        config.storage.authorization = Some(auth);
    }
}
