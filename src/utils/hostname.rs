//! Host extraction for template fields and analytics.

use url::Url;

/// Extracts the host part of a URL.
///
/// Handles:
/// - IPv4 addresses (e.g., `192.168.1.1`)
/// - IPv6 addresses (e.g., `[::1]`)
/// - Hostnames with ports (port is stripped)
///
/// Returns `None` if the input does not parse or has no host
/// (e.g. `mailto:` or `data:` URLs).
///
/// # Examples
///
/// ```ignore
/// assert_eq!(hostname_of("https://www.example.com:8080/a").as_deref(), Some("www.example.com"));
/// assert_eq!(hostname_of("not a url"), None);
/// ```
pub fn hostname_of(input: &str) -> Option<String> {
    let url = Url::parse(input).ok()?;
    let host = url.host_str()?;

    if host.is_empty() {
        return None;
    }

    Some(host.to_string())
}

/// Strips a leading `www.` from a host name.
pub fn registrable_domain(host: &str) -> String {
    host.strip_prefix("www.").unwrap_or(host).to_string()
}
