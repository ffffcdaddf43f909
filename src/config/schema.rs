//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files, and
//! every section has defaults so a minimal config stays minimal.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the artifact proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Lookup service (domain → deployment) settings.
    pub lookup: LookupConfig,

    /// Object-storage backend settings.
    pub storage: StorageConfig,

    /// Host cache sizing and expiry.
    pub host_cache: HostCacheConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Lookup service configuration.
///
/// The lookup API maps a request domain to its deployment payload. The token
/// is normally injected via the `ARTIFACT_PROXY_LOOKUP_TOKEN` environment
/// variable rather than written into the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Base URL of the lookup API (e.g., "https://api.example.com").
    pub api_url: String,

    /// Token sent as `Authorization: Token {token}`.
    pub api_token: String,

    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_token: String::new(),
            timeout_secs: 5,
        }
    }
}

/// Object-storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Endpoint base URL (e.g., "https://s3.amazonaws.com").
    pub endpoint: String,

    /// Bucket holding all deployment artifacts.
    pub bucket: String,

    /// Optional static Authorization value attached to storage reads.
    /// Client credentials are never forwarded; this is the proxy's own.
    pub authorization: Option<String>,

    /// Per-read timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://s3.amazonaws.com".to_string(),
            bucket: String::new(),
            authorization: None,
            timeout_secs: 30,
        }
    }
}

/// Host cache sizing and expiry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostCacheConfig {
    /// Seconds a resolved host config stays fresh.
    pub ttl_secs: u64,

    /// Maximum number of cached domains; the least-recently-used entry is
    /// evicted when an insert would exceed this.
    pub capacity: usize,
}

impl Default for HostCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 120,
            capacity: 128,
        }
    }
}

impl HostCacheConfig {
    /// Default TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Timeout configuration for the inbound surface.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Whether to expose Prometheus metrics.
    pub metrics_enabled: bool,

    /// Address for the metrics exposition endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
