//! Client response assembly.
//!
//! Pure mapping from an upstream read to the client-facing response: status
//! normalization, header copy-through, computed Cache-Control. The client
//! only ever observes 200, 304, or 404.

use axum::body::Body;
use axum::response::Response;
use http::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE, SERVER};
use http::StatusCode;

use crate::fetcher::UpstreamResult;
use crate::policy::cache_control::cache_control;
use crate::SERVER_IDENT;

const NOT_FOUND_FILE: &str = "<!doctype html>\n<html>\n<head><title>404 Not Found</title></head>\n<body>\n<h1>404 Not Found</h1>\n<p>The requested file does not exist in this deployment.</p>\n</body>\n</html>\n";

const NOT_FOUND_HOST: &str = "<!doctype html>\n<html>\n<head><title>404 Not Found</title></head>\n<body>\n<h1>404 Not Found</h1>\n<p>No deployment is configured for this domain.</p>\n</body>\n</html>\n";

fn server_ident() -> HeaderValue {
    HeaderValue::from_static(SERVER_IDENT)
}

/// Build the client response for an upstream result.
///
/// - 200 passes through with forwarded headers and computed Cache-Control
/// - 304 passes through with an empty body
/// - every other upstream status collapses to the 404 page
pub fn build_response(upstream: UpstreamResult) -> Response {
    match upstream.status {
        StatusCode::OK => {
            let mut builder = Response::builder().status(StatusCode::OK);

            if let Some(headers) = builder.headers_mut() {
                for (name, value) in upstream.headers.iter() {
                    headers.insert(name.clone(), value.clone());
                }
                if let Some(ct) = upstream.content_type.as_deref() {
                    if let Ok(value) = HeaderValue::from_str(ct) {
                        headers.insert(CONTENT_TYPE, value);
                    }
                }
                let directive = cache_control(upstream.content_type.as_deref());
                if let Ok(value) = HeaderValue::from_str(&directive) {
                    headers.insert(CACHE_CONTROL, value);
                }
                headers.insert(SERVER, server_ident());
            }

            builder
                .body(upstream.body)
                .unwrap_or_else(|_| not_found_file())
        }
        StatusCode::NOT_MODIFIED => {
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::NOT_MODIFIED;
            response.headers_mut().insert(SERVER, server_ident());
            response
        }
        other => {
            tracing::debug!(upstream_status = %other, "Masking upstream status as 404");
            not_found_file()
        }
    }
}

/// 404 for a missing object within a resolved deployment.
pub fn not_found_file() -> Response {
    not_found(NOT_FOUND_FILE)
}

/// 404 for a domain the lookup service does not know.
pub fn not_found_host() -> Response {
    not_found(NOT_FOUND_HOST)
}

fn not_found(page: &'static str) -> Response {
    let mut response = Response::new(Body::from(page));
    *response.status_mut() = StatusCode::NOT_FOUND;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
    headers.insert(SERVER, server_ident());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::HeaderMap;
    use http_body_util::BodyExt;

    fn upstream(status: StatusCode, content_type: Option<&str>) -> UpstreamResult {
        UpstreamResult {
            status,
            headers: HeaderMap::new(),
            content_type: content_type.map(|s| s.to_string()),
            body: Body::from("body-bytes"),
        }
    }

    #[tokio::test]
    async fn test_ok_passes_through_with_forwarded_headers() {
        let mut result = upstream(StatusCode::OK, Some("text/html"));
        result.headers.insert("content-length", "123".parse().unwrap());
        result
            .headers
            .insert("last-modified", "Mon, 01 Jan 2024 00:00:00 GMT".parse().unwrap());
        result.headers.insert("etag", "\"abc\"".parse().unwrap());

        let response = build_response(result);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("cache-control").unwrap(), "max-age=300");
        assert_eq!(response.headers().get("content-length").unwrap(), "123");
        assert_eq!(
            response.headers().get("last-modified").unwrap(),
            "Mon, 01 Jan 2024 00:00:00 GMT"
        );
        assert_eq!(response.headers().get("etag").unwrap(), "\"abc\"");
        assert_eq!(response.headers().get("content-type").unwrap(), "text/html");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"body-bytes");
    }

    #[tokio::test]
    async fn test_absent_headers_stay_absent() {
        let response = build_response(upstream(StatusCode::OK, Some("image/png")));
        assert!(response.headers().get("etag").is_none());
        assert!(response.headers().get("last-modified").is_none());
        assert_eq!(
            response.headers().get("cache-control").unwrap(),
            "max-age=31536000"
        );
    }

    #[tokio::test]
    async fn test_not_modified_has_empty_body() {
        let response = build_response(upstream(StatusCode::NOT_MODIFIED, None));
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_other_statuses_collapse_to_404() {
        for status in [
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
        ] {
            let response = build_response(upstream(status, Some("text/html")));
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{status}");
        }
    }

    #[tokio::test]
    async fn test_unknown_content_type_is_no_cache() {
        let response = build_response(upstream(StatusCode::OK, Some("application/octet-stream")));
        assert_eq!(response.headers().get("cache-control").unwrap(), "no-cache");
    }

    #[test]
    fn test_every_response_carries_server_ident() {
        let response = not_found_host();
        assert!(response
            .headers()
            .get("server")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("artifact-proxy/"));
    }
}
