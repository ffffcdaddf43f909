//! Crate-wide error taxonomy.
//!
//! # Propagation policy
//! - `ResolutionError` and `UpstreamError` terminate the pipeline; the
//!   handler maps both to a client-facing 404 and never forwards them.
//! - Policy fallout (unknown content type) is absorbed inside the policy
//!   engine as the `no-cache` fallback and never reaches this layer.

use thiserror::Error;

/// Errors from resolving a request domain against the lookup service.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// Lookup service answered with a non-success status.
    #[error("lookup returned status {0}")]
    Status(u16),

    /// Lookup call did not complete within the configured bound.
    #[error("lookup timed out after {0} seconds")]
    Timeout(u64),

    /// Lookup payload could not be parsed or lacked a storage path.
    #[error("malformed lookup payload: {0}")]
    Malformed(String),

    /// Connection-level failure talking to the lookup service.
    #[error("lookup transport error: {0}")]
    Transport(String),
}

/// Errors from the storage read.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Storage answered, but with a status the fetcher refuses to stream
    /// (connection-level refusal, not a content status — 4xx/5xx content
    /// statuses flow through to the policy engine).
    #[error("storage returned status {0}")]
    Status(u16),

    /// Storage read did not complete within the configured bound.
    #[error("storage read timed out after {0} seconds")]
    Timeout(u64),

    /// Connection-level failure talking to storage.
    #[error("storage transport error: {0}")]
    Transport(String),
}
