//! Header allow-lists shared by the fetcher and the policy engine.
//!
//! Only the headers named here ever cross the proxy boundary in either
//! direction; everything else on the wire is dropped. Both lists are static
//! data so the filtering stays a table scan rather than a branch pile.

use http::header::{
    HeaderMap, HeaderName, CACHE_CONTROL, CONTENT_LENGTH, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH,
    LAST_MODIFIED,
};

/// Inbound headers forwarded to the storage backend.
pub const PROXY_REQUEST_HEADERS: [HeaderName; 3] =
    [CACHE_CONTROL, IF_MODIFIED_SINCE, IF_NONE_MATCH];

/// Upstream headers copied through to the client response.
pub const PROXY_RESPONSE_HEADERS: [HeaderName; 3] = [CONTENT_LENGTH, LAST_MODIFIED, ETAG];

/// Keep only the headers listed in `fields` that also carry a value.
///
/// Absent headers are omitted from the result, never defaulted.
pub fn filter_headers(headers: &HeaderMap, fields: &[HeaderName]) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(fields.len());
    for field in fields {
        if let Some(value) = headers.get(field) {
            if !value.is_empty() {
                filtered.insert(field.clone(), value.clone());
            }
        }
    }
    filtered
}
