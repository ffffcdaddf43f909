//! Bounded, TTL-expiring cache of resolved host configurations.
//!
//! # Responsibilities
//! - Serve fresh entries without touching the lookup service
//! - Treat expired entries as absent and refetch on next access
//! - Evict exactly the least-recently-used entry on overflow
//! - Coalesce concurrent misses for one domain into a single lookup
//!
//! # Design Decisions
//! - The LRU store sits behind a `parking_lot::Mutex` held only for map
//!   operations, never across I/O; unrelated domains therefore never
//!   serialize on each other's lookups
//! - Coalescing uses a per-domain async gate with a re-check after
//!   acquisition: the winner fills the cache, losers observe the fill
//! - A failed lookup caches nothing; expired entries are never substituted

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use lru::LruCache;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::error::ResolutionError;
use crate::observability::metrics;
use crate::resolver::lookup::Lookup;
use crate::resolver::HostConfig;

/// A cached host configuration with its expiry deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    config: Arc<HostConfig>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Bounded mapping from request domain to resolved deployment configuration.
pub struct HostCache<L> {
    entries: Mutex<LruCache<String, CacheEntry>>,
    inflight: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
    lookup: L,
    default_ttl: Duration,
}

impl<L: Lookup> HostCache<L> {
    /// Create an empty cache over the given lookup collaborator.
    pub fn new(lookup: L, capacity: usize, default_ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            inflight: DashMap::new(),
            lookup,
            default_ttl,
        }
    }

    /// Resolve a domain, from cache when fresh, otherwise via the lookup
    /// collaborator.
    pub async fn resolve(&self, domain: &str) -> Result<Arc<HostConfig>, ResolutionError> {
        if let Some(config) = self.get_fresh(domain) {
            metrics::record_host_cache_hit();
            return Ok(config);
        }

        // Serialize misses for this one domain; other domains proceed.
        let gate = self.inflight.entry(domain.to_string()).or_default().clone();
        let held = gate.lock().await;

        // The winning flight may have filled the cache while we waited.
        if let Some(config) = self.get_fresh(domain) {
            metrics::record_host_cache_hit();
            return Ok(config);
        }

        metrics::record_host_cache_miss();
        let config = match self.lookup.lookup(domain).await {
            Ok(config) => Arc::new(config),
            Err(e) => {
                drop(held);
                self.inflight.remove(domain);
                return Err(e);
            }
        };

        let ttl = config.ttl_override.unwrap_or(self.default_ttl);
        self.insert(domain, config.clone(), ttl);
        drop(held);
        self.inflight.remove(domain);
        Ok(config)
    }

    /// Number of live entries, expired ones included until observed.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn get_fresh(&self, domain: &str) -> Option<Arc<HostConfig>> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(domain) {
            None => return None,
            Some(entry) if !entry.is_expired() => return Some(entry.config.clone()),
            Some(_) => true,
        };
        if expired {
            entries.pop(domain);
        }
        None
    }

    fn insert(&self, domain: &str, config: Arc<HostConfig>, ttl: Duration) {
        let entry = CacheEntry {
            config,
            expires_at: Instant::now() + ttl,
        };
        let mut entries = self.entries.lock();
        if let Some((evicted, _)) = entries.push(domain.to_string(), entry) {
            if evicted != domain {
                tracing::debug!(domain = %evicted, "Evicted least-recently-used host config");
                metrics::record_host_cache_eviction();
            }
        }
        metrics::record_host_cache_size(entries.len());
    }
}
