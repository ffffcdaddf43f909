//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, outcome
//! - `proxy_request_duration_seconds` (histogram): latency distribution
//! - `host_cache_hits_total` / `host_cache_misses_total` (counters)
//! - `host_cache_evictions_total` (counter): LRU evictions
//! - `host_cache_entries` (gauge): current cache population

use std::net::SocketAddr;

use http::{Method, StatusCode};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::time::Instant;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter");
    } else {
        tracing::info!(address = %addr, "Metrics exporter listening");
    }
}

/// Record one completed request.
pub fn record_request(method: &Method, status: StatusCode, outcome: &str, start: Instant) {
    counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.as_u16().to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    histogram!("proxy_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_host_cache_hit() {
    counter!("host_cache_hits_total").increment(1);
}

pub fn record_host_cache_miss() {
    counter!("host_cache_misses_total").increment(1);
}

pub fn record_host_cache_eviction() {
    counter!("host_cache_evictions_total").increment(1);
}

pub fn record_host_cache_size(len: usize) {
    gauge!("host_cache_entries").set(len as f64);
}
