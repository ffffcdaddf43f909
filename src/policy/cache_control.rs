//! Content-type-driven Cache-Control computation.
//!
//! The max-age table is static data, not branching: artifacts are immutable
//! per deployment, so everything fingerprintable gets a year and HTML gets
//! five minutes. Anything the table does not know is served `no-cache`.

/// One year, in seconds.
const ONE_YEAR: u32 = 31_536_000;

/// Five minutes, in seconds.
const FIVE_MINUTES: u32 = 300;

/// Static mapping from normalized content type to Cache-Control max-age.
pub const CACHE_MAX_AGES: &[(&str, u32)] = &[
    // Markup re-validates quickly so deploys become visible.
    ("text/html", FIVE_MINUTES),
    // Styles and scripts.
    ("text/css", ONE_YEAR),
    ("text/javascript", ONE_YEAR),
    ("application/javascript", ONE_YEAR),
    ("application/x-javascript", ONE_YEAR),
    // Feeds and manifests.
    ("text/xml", ONE_YEAR),
    ("application/xml", ONE_YEAR),
    ("application/atom+xml", ONE_YEAR),
    ("application/rss+xml", ONE_YEAR),
    ("application/manifest+json", ONE_YEAR),
    // Video.
    ("video/mp4", ONE_YEAR),
    ("video/webm", ONE_YEAR),
    // Audio.
    ("audio/mpeg", ONE_YEAR),
    ("audio/webm", ONE_YEAR),
    // Images. SVGZ shares the SVG content type (gzip is an encoding).
    ("image/jpeg", ONE_YEAR),
    ("image/pjpeg", ONE_YEAR),
    ("image/png", ONE_YEAR),
    ("image/gif", ONE_YEAR),
    ("image/svg+xml", ONE_YEAR),
    ("image/x-icon", ONE_YEAR),
    ("image/vnd.microsoft.icon", ONE_YEAR),
    // Fonts.
    ("font/ttf", ONE_YEAR),
    ("font/collection", ONE_YEAR),
    ("font/otf", ONE_YEAR),
    ("application/vnd.ms-fontobject", ONE_YEAR),
    ("font/woff", ONE_YEAR),
    ("application/font-woff", ONE_YEAR),
    ("font/woff2", ONE_YEAR),
];

/// Strip parameters and case from a content-type value.
///
/// `Text/HTML; charset=utf-8` → `text/html`.
fn normalize(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Look up the max-age for a content type, if it is cacheable at all.
pub fn max_age(content_type: &str) -> Option<u32> {
    let normalized = normalize(content_type);
    CACHE_MAX_AGES
        .iter()
        .find(|(ct, _)| *ct == normalized)
        .map(|(_, age)| *age)
}

/// Compute the Cache-Control value for a response.
///
/// Unknown or absent content types fall back to `no-cache`; that fallback is
/// the whole of the policy's error handling.
pub fn cache_control(content_type: Option<&str>) -> String {
    match content_type.and_then(max_age) {
        Some(age) => format!("max-age={age}"),
        None => "no-cache".to_string(),
    }
}
