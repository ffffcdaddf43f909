//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! Returns every violation found, not just the first, so an operator fixes a
//! bad config in one pass.

use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic violation in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "storage.bucket").
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn err(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Validate a configuration, collecting all violations.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.lookup.api_url.is_empty() {
        errors.push(err("lookup.api_url", "must be set"));
    } else if Url::parse(&config.lookup.api_url).is_err() {
        errors.push(err("lookup.api_url", "is not a valid URL"));
    }

    if config.lookup.timeout_secs == 0 {
        errors.push(err("lookup.timeout_secs", "must be greater than zero"));
    }

    if config.storage.bucket.is_empty() {
        errors.push(err("storage.bucket", "must be set"));
    }

    if Url::parse(&config.storage.endpoint).is_err() {
        errors.push(err("storage.endpoint", "is not a valid URL"));
    }

    if config.storage.timeout_secs == 0 {
        errors.push(err("storage.timeout_secs", "must be greater than zero"));
    }

    if config.host_cache.capacity == 0 {
        errors.push(err("host_cache.capacity", "must be at least 1"));
    }

    if config.host_cache.ttl_secs == 0 {
        errors.push(err("host_cache.ttl_secs", "must be greater than zero"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(err("timeouts.request_secs", "must be greater than zero"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
