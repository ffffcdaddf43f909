//! Lookup service client.
//!
//! The lookup API maps a domain to its deployment payload. The payload must
//! carry a non-null `path` (the bucket-relative prefix) and may carry a
//! `cache_ttl` seconds override honored by the host cache.

use std::future::Future;
use std::time::Duration;

use axum::body::Body;
use http::header::{HeaderValue, AUTHORIZATION, USER_AGENT};
use http::Request;
use http_body_util::BodyExt;
use tokio::time::Instant;
use url::Url;

use crate::error::ResolutionError;
use crate::http::WireClient;
use crate::resolver::HostConfig;
use crate::SERVER_IDENT;

/// A collaborator that resolves a domain to its deployment payload.
///
/// Declared with the desugared future form so implementations stay `Send`
/// and tests can substitute counting fakes without a boxing crate.
pub trait Lookup: Send + Sync + 'static {
    /// Resolve `domain` to a fresh [`HostConfig`].
    fn lookup(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<HostConfig, ResolutionError>> + Send;
}

/// HTTP client for the lookup API.
pub struct HttpLookupClient {
    client: WireClient,
    endpoint: Url,
    token: String,
    timeout: Duration,
}

impl HttpLookupClient {
    /// Create a client against `api_url` with the given token.
    ///
    /// `api_url` must have been validated at config load time.
    pub fn new(
        client: WireClient,
        api_url: &str,
        token: &str,
        timeout_secs: u64,
    ) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(api_url)?.join("/v1/domains/")?;

        Ok(Self {
            client,
            endpoint,
            token: token.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    fn domain_url(&self, domain: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("domain", domain);
        url
    }
}

impl Lookup for HttpLookupClient {
    async fn lookup(&self, domain: &str) -> Result<HostConfig, ResolutionError> {
        let url = self.domain_url(domain);
        let authorization = HeaderValue::from_str(&format!("Token {}", self.token))
            .map_err(|e| ResolutionError::Transport(e.to_string()))?;

        let request = Request::get(url.as_str())
            .header(AUTHORIZATION, authorization)
            .header(USER_AGENT, SERVER_IDENT)
            .body(Body::empty())
            .map_err(|e| ResolutionError::Transport(e.to_string()))?;

        let response = tokio::time::timeout(self.timeout, self.client.request(request))
            .await
            .map_err(|_| ResolutionError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| ResolutionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolutionError::Status(status.as_u16()));
        }

        let body = tokio::time::timeout(self.timeout, response.into_body().collect())
            .await
            .map_err(|_| ResolutionError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| ResolutionError::Transport(e.to_string()))?
            .to_bytes();

        let payload: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| ResolutionError::Malformed(e.to_string()))?;

        parse_payload(domain, payload)
    }
}

/// Build a [`HostConfig`] from a lookup payload.
///
/// A payload with a missing or null `path` means the lookup service does not
/// know the domain, which resolves nothing.
pub fn parse_payload(
    domain: &str,
    payload: serde_json::Value,
) -> Result<HostConfig, ResolutionError> {
    let prefix = payload
        .get("path")
        .and_then(|v| v.as_str())
        .map(|s| s.trim_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ResolutionError::Malformed("payload has no storage path".to_string()))?;

    let ttl_override = payload
        .get("cache_ttl")
        .and_then(|v| v.as_u64())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);

    Ok(HostConfig {
        domain: domain.to_string(),
        prefix,
        raw: payload,
        fetched_at: Instant::now(),
        ttl_override,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_payload_extracts_prefix() {
        let config = parse_payload("example.com", json!({"path": "/sites/abc/"})).unwrap();
        assert_eq!(config.domain, "example.com");
        assert_eq!(config.prefix, "sites/abc");
        assert!(config.ttl_override.is_none());
    }

    #[test]
    fn test_parse_payload_honors_ttl_override() {
        let config =
            parse_payload("example.com", json!({"path": "sites/abc", "cache_ttl": 600})).unwrap();
        assert_eq!(config.ttl_override, Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_parse_payload_rejects_missing_path() {
        assert!(matches!(
            parse_payload("example.com", json!({"custom_404": true})),
            Err(ResolutionError::Malformed(_))
        ));
        assert!(matches!(
            parse_payload("example.com", json!({"path": null})),
            Err(ResolutionError::Malformed(_))
        ));
    }
}
