//! Proxy fetcher: one bounded read against the storage backend.
//!
//! # Responsibilities
//! - Map request path + host prefix to a single object key
//! - Forward only the allow-listed conditional request headers
//! - Return status/headers/content type/body stream unmodified
//!
//! # Design Decisions
//! - Exactly one GET per request, bounded by the storage timeout
//! - Client cookies, credentials, and arbitrary headers never reach storage;
//!   the proxy's own storage authorization is attached separately
//! - 4xx/5xx content statuses are results, not errors — the policy engine
//!   owns their client-facing mapping

use std::time::Duration;

use axum::body::Body;
use http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, StatusCode, Uri};

use crate::config::StorageConfig;
use crate::error::UpstreamError;
use crate::headers::{filter_headers, PROXY_REQUEST_HEADERS, PROXY_RESPONSE_HEADERS};
use crate::http::WireClient;
use crate::resolver::HostConfig;

/// The slice of an inbound request the fetcher is allowed to see.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    /// Request method (GET or HEAD).
    pub method: Method,

    /// Request path, as received (still percent-encoded).
    pub path: String,

    /// Inbound headers limited to the conditional-request allow-list.
    pub headers: HeaderMap,
}

impl ProxyRequest {
    /// Build a proxy request from inbound parts, dropping every header
    /// outside the allow-list.
    pub fn new(method: Method, path: &str, inbound_headers: &HeaderMap) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: filter_headers(inbound_headers, &PROXY_REQUEST_HEADERS),
        }
    }
}

/// Raw upstream read result, body still streaming.
#[derive(Debug)]
pub struct UpstreamResult {
    /// Status as received from storage.
    pub status: StatusCode,

    /// Upstream headers limited to the response allow-list.
    pub headers: HeaderMap,

    /// Content type of the object, if storage reported one.
    pub content_type: Option<String>,

    /// Object body; finite and not restartable.
    pub body: Body,
}

/// Issues object reads against the storage backend.
pub struct StorageFetcher {
    client: WireClient,
    endpoint: String,
    bucket: String,
    authorization: Option<HeaderValue>,
    timeout: Duration,
}

impl StorageFetcher {
    /// Create a fetcher for the configured storage backend.
    pub fn new(client: WireClient, config: &StorageConfig) -> Self {
        let authorization = config
            .authorization
            .as_deref()
            .and_then(|v| HeaderValue::from_str(v).ok());

        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            authorization,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Perform one read of the object backing `request` under `config`.
    pub async fn fetch(
        &self,
        config: &HostConfig,
        request: &ProxyRequest,
    ) -> Result<UpstreamResult, UpstreamError> {
        let key = object_key(&config.prefix, &request.path);
        let uri: Uri = format!("{}/{}/{}", self.endpoint, self.bucket, key)
            .parse()
            .map_err(|e: http::uri::InvalidUri| UpstreamError::Transport(e.to_string()))?;

        tracing::debug!(
            domain = %config.domain,
            key = %key,
            "Fetching object from storage"
        );

        let mut builder = Request::builder().method(request.method.clone()).uri(uri);
        if let Some(headers) = builder.headers_mut() {
            for (name, value) in request.headers.iter() {
                headers.insert(name.clone(), value.clone());
            }
            if let Some(auth) = &self.authorization {
                headers.insert(AUTHORIZATION, auth.clone());
            }
        }

        let outbound = builder
            .body(Body::empty())
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let response = tokio::time::timeout(self.timeout, self.client.request(outbound))
            .await
            .map_err(|_| UpstreamError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_informational() {
            // Nothing streamable behind a 1xx; treat as a backend fault.
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let headers = filter_headers(response.headers(), &PROXY_RESPONSE_HEADERS);

        Ok(UpstreamResult {
            status,
            headers,
            content_type,
            body: Body::new(response.into_body()),
        })
    }
}

/// Map a request path onto a bucket-relative object key.
///
/// Empty paths and directory paths get the directory index appended, so
/// `/` and `/docs/` serve `index.html` inside the deployment prefix.
pub fn object_key(prefix: &str, path: &str) -> String {
    let mut resource = path.trim_start_matches('/').to_string();
    if resource.is_empty() || resource.ends_with('/') {
        resource.push_str("index.html");
    }
    format!("{}/{}", prefix.trim_matches('/'), resource)
}
