//! Domain resolution subsystem.
//!
//! Maps a request domain to its deployment's storage location, caching the
//! answer in a bounded TTL'd store so the lookup service only sees traffic
//! for cold or expired domains.
//!
//! # Data Flow
//! ```text
//! Host header
//!     → HostCache::resolve (fresh hit: done, zero lookup calls)
//!     → per-domain in-flight gate (concurrent misses coalesce)
//!     → Lookup::lookup (one bounded HTTP call)
//!     → HostConfig cached (LRU-evicting) and returned
//! ```

pub mod host_cache;
pub mod lookup;

use std::time::Duration;

use tokio::time::Instant;

pub use host_cache::HostCache;
pub use lookup::{HttpLookupClient, Lookup};

/// Resolved mapping from a request domain to its backing storage location.
///
/// Immutable once created; refreshes replace the whole value, never mutate
/// it in place. Shared across requests as `Arc<HostConfig>`.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// The request domain this config answers for.
    pub domain: String,

    /// Bucket-relative object prefix for this deployment.
    pub prefix: String,

    /// Full payload returned by the lookup service.
    pub raw: serde_json::Value,

    /// When the lookup that produced this config completed.
    pub fetched_at: Instant,

    /// Per-host TTL override carried in the lookup payload, if any.
    pub ttl_override: Option<Duration>,
}
