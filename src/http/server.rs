//! HTTP server setup and the request pipeline handler.
//!
//! # Responsibilities
//! - Create the axum Router with the catch-all artifact route
//! - Wire up middleware (tracing, request timeout)
//! - Compose resolve → fetch → policy per inbound request
//! - Map every pipeline failure to the client-facing 404

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header::HOST, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::time::Instant;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{ConfigError, ProxyConfig};
use crate::fetcher::{ProxyRequest, StorageFetcher};
use crate::http::wire_client;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::policy::{build_response, not_found_file, not_found_host};
use crate::resolver::{HostCache, HttpLookupClient};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<HostCache<HttpLookupClient>>,
    pub fetcher: Arc<StorageFetcher>,
}

/// HTTP server for the artifact proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given (validated) configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ConfigError> {
        let client = wire_client();

        let lookup = HttpLookupClient::new(
            client.clone(),
            &config.lookup.api_url,
            &config.lookup.api_token,
            config.lookup.timeout_secs,
        )
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let cache = Arc::new(HostCache::new(
            lookup,
            config.host_cache.capacity,
            config.host_cache.ttl(),
        ));
        let fetcher = Arc::new(StorageFetcher::new(client, &config.storage));

        let state = AppState { cache, fetcher };
        let router = Self::build_router(&config, state);

        Ok(Self { router })
    }

    /// Build the axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", get(proxy_handler))
            .route("/", get(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server on the given listener until shutdown triggers.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut rx = shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = rx.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main pipeline handler: resolve the domain, read the object, apply policy.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let Some(domain) = request_domain(&request) else {
        tracing::warn!(request_id = %request_id, path = %path, "Request without a Host header");
        metrics::record_request(&method, StatusCode::NOT_FOUND, "no_host", start_time);
        return not_found_host().into_response();
    };

    tracing::debug!(
        request_id = %request_id,
        domain = %domain,
        method = %method,
        path = %path,
        "Proxying request"
    );

    // 1. Resolve the domain to its deployment.
    let host_config = match state.cache.resolve(&domain).await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(request_id = %request_id, domain = %domain, error = %e, "Resolution failed");
            metrics::record_request(&method, StatusCode::NOT_FOUND, "resolve_error", start_time);
            return not_found_host().into_response();
        }
    };

    // 2. One bounded read against storage.
    let proxy_request = ProxyRequest::new(method.clone(), &path, request.headers());
    let upstream = match state.fetcher.fetch(&host_config, &proxy_request).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(request_id = %request_id, domain = %domain, error = %e, "Storage read failed");
            metrics::record_request(&method, StatusCode::NOT_FOUND, "fetch_error", start_time);
            return not_found_file().into_response();
        }
    };

    // 3. Policy: status normalization + header rewrite.
    let response = build_response(upstream);
    metrics::record_request(&method, response.status(), "ok", start_time);
    response
}

/// Extract the request domain: Host header first, then the URI authority,
/// port stripped and lowercased.
fn request_domain(request: &Request<Body>) -> Option<String> {
    let raw = request
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| request.uri().host())?;

    let host = raw.rsplit_once(':').map_or(raw, |(name, port)| {
        // Only strip a real port; IPv6 literals keep their colons.
        if port.chars().all(|c| c.is_ascii_digit()) {
            name
        } else {
            raw
        }
    });

    let host = host.trim().to_ascii_lowercase();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}
