//! Inbound HTTP surface and the shared wire client.
//!
//! # Responsibilities
//! - Build the axum router and middleware stack
//! - Compose the per-request pipeline (resolve → fetch → policy)
//! - Own the hyper client used to talk to lookup and storage

pub mod server;

use axum::body::Body;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

pub use server::{AppState, HttpServer};

/// Shared HTTP client for both external collaborators.
pub type WireClient = Client<HttpConnector, Body>;

/// Build the wire client on the tokio executor.
pub fn wire_client() -> WireClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}
