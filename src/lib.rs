//! Caching reverse proxy for static deployment artifacts.
//!
//! Serves objects out of a storage bucket, resolving which deployment backs
//! each request domain through an external lookup service, and rewriting
//! response headers according to a content-type-driven caching policy.
//!
//! # Request pipeline
//! ```text
//! inbound request
//!     → resolver (host cache, lookup service on miss)
//!     → fetcher (one bounded storage read, conditional headers forwarded)
//!     → policy (status normalization, Cache-Control computation)
//!     → client response (200, 304, or 404 — nothing else)
//! ```

pub mod config;
pub mod error;
pub mod fetcher;
pub mod headers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod policy;
pub mod resolver;

/// Service identity sent upstream and attached to every response.
pub const SERVER_IDENT: &str = concat!("artifact-proxy/", env!("CARGO_PKG_VERSION"));

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
