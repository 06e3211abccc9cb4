//! URL helpers for reaching the backend.
//!
//! The widget talks to a single same-origin backend. Whatever address the
//! user supplies is reduced to its origin once at startup, and endpoint URLs
//! are built from that origin without doubled slashes.

use reqwest::Url;

/// Remove trailing slashes from a base URL.
///
/// ```
/// use jobi::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:5001/"), "http://localhost:5001");
/// assert_eq!(normalize_base_url("http://localhost:5001///"), "http://localhost:5001");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash.
///
/// An empty endpoint yields the root of the base, with a trailing slash.
///
/// ```
/// use jobi::utils::url::construct_api_url;
///
/// assert_eq!(construct_api_url("http://localhost:5001/", "/chat"), "http://localhost:5001/chat");
/// assert_eq!(construct_api_url("http://localhost:5001", ""), "http://localhost:5001/");
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Reduce a page or server address to its origin (`scheme://host[:port]`).
///
/// Paths, queries and fragments are discarded, so `http://host/index.html`
/// and `http://host/` resolve to the same backend.
pub fn resolve_origin(address: &str) -> Result<String, String> {
    let url = Url::parse(address.trim()).map_err(|err| format!("invalid URL {address:?}: {err}"))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported URL scheme {other:?} in {address:?}")),
    }

    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(format!("URL {address:?} has no usable origin"));
    }
    Ok(origin.ascii_serialization())
}
