//! Tracking-parameter removal for copied URLs.
//!
//! Query parameters are classified against two static lists: tracking
//! parameters are always stripped when cleaning is active, functional ones
//! are always kept. Everything else depends on the [`CleaningMode`].

use crate::domain::entities::CleaningMode;
use url::Url;

/// Parameters used for marketing or analytics attribution.
pub const TRACKING_PARAMS: &[&str] = &[
    // Google Analytics / Urchin
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "utm_id",
    "utm_name",
    "utm_cid",
    "utm_reader",
    "utm_referrer",
    "utm_social",
    "utm_social-type",
    "_ga",
    "_gl",
    // Ad click identifiers
    "gclid",
    "gclsrc",
    "dclid",
    "gbraid",
    "wbraid",
    "fbclid",
    "msclkid",
    "yclid",
    "twclid",
    "ttclid",
    "li_fat_id",
    "igshid",
    // Email and marketing automation
    "mc_cid",
    "mc_eid",
    "_hsenc",
    "_hsmi",
    "hsctatracking",
    "mkt_tok",
    "vero_id",
    "oly_anon_id",
    "oly_enc_id",
    "rb_clickid",
    "s_cid",
    "trk",
    "trkcampaign",
    // Social share attribution
    "ref_src",
    "ref_url",
    "share_source",
    "share_medium",
    "share_plat",
    "share_session_id",
    "share_tag",
    "vd_source",
    "spm",
    "scm",
    "si",
];

/// Parameters that change page behaviour or content.
pub const FUNCTIONAL_PARAMS: &[&str] = &[
    "id", "page", "p", "q", "query", "search", "s", "v", "t", "list", "index", "tab", "sort",
    "order", "filter", "category", "cat", "lang", "hl", "type", "format", "view", "mode", "start",
    "end", "limit", "offset", "size", "year", "month", "day", "item", "product", "sku", "variant",
    "path", "file", "version", "branch", "commit",
];

/// Decides whether a query parameter survives cleaning.
///
/// Functional parameters are always kept and tracking parameters always
/// dropped, regardless of mode. Unknown parameters are kept unless the mode
/// is [`CleaningMode::Aggressive`]. Matching is case-insensitive.
pub fn should_keep_param(name: &str, mode: CleaningMode) -> bool {
    let lower = name.to_ascii_lowercase();

    if FUNCTIONAL_PARAMS.contains(&lower.as_str()) {
        return true;
    }

    if TRACKING_PARAMS.contains(&lower.as_str()) {
        return false;
    }

    mode != CleaningMode::Aggressive
}

/// Cleans a URL according to `mode`.
///
/// # Rules
///
/// - **Off**: the input is returned unchanged
/// - **Smart**: parameters rejected by [`should_keep_param`] are removed,
///   the fragment is preserved; if nothing is removed the input is returned as-is
/// - **Aggressive**: the query string and fragment are removed entirely
///
/// Unparseable input is returned unchanged so a copy never fails just
/// because a URL looks unusual.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     clean_url("https://example.com/page?utm_source=news&id=42", CleaningMode::Smart),
///     "https://example.com/page?id=42"
/// );
/// assert_eq!(
///     clean_url("https://example.com/page?id=42#top", CleaningMode::Aggressive),
///     "https://example.com/page"
/// );
/// ```
pub fn clean_url(input: &str, mode: CleaningMode) -> String {
    if mode == CleaningMode::Off {
        return input.to_string();
    }

    let Ok(mut url) = Url::parse(input) else {
        return input.to_string();
    };

    if mode == CleaningMode::Aggressive {
        url.set_query(None);
        url.set_fragment(None);
        return url.to_string();
    }

    if url.query().is_none() {
        return input.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let kept: Vec<&(String, String)> = pairs
        .iter()
        .filter(|(name, _)| should_keep_param(name, mode))
        .collect();

    if kept.len() == pairs.len() {
        return input.to_string();
    }

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    url.to_string()
}

/// Returns `true` if a URL can be sent to a public shortening service.
///
/// Only absolute `http`/`https` URLs with a host that is not local are accepted.
pub fn is_shortenable(input: &str) -> bool {
    let Ok(url) = Url::parse(input) else {
        return false;
    };

    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }

    match url.host() {
        Some(url::Host::Domain(domain)) => {
            let domain = domain.to_ascii_lowercase();
            domain != "localhost" && !domain.ends_with(".localhost") && !domain.ends_with(".local")
        }
        Some(url::Host::Ipv4(ip)) => !(ip.is_loopback() || ip.is_private() || ip.is_unspecified()),
        Some(url::Host::Ipv6(ip)) => !(ip.is_loopback() || ip.is_unspecified()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_URLS: &[&str] = &[
        "https://example.com/page?utm_source=news&id=42",
        "https://example.com/a?b=1&utm_medium=x#frag",
        "https://shop.example.com/item?sku=9&fbclid=abc&color=red",
        "http://example.com:8080/path?q=rust&gclid=1",
        "https://example.com/",
        "https://example.com/search?q=a+b&page=2",
    ];

    #[test]
    fn test_off_is_identity() {
        for url in SAMPLE_URLS.iter().chain(&["not a url", ""]) {
            assert_eq!(clean_url(url, CleaningMode::Off), *url);
        }
    }

    #[test]
    fn test_smart_drops_tracking_keeps_functional() {
        assert_eq!(
            clean_url(
                "https://example.com/page?utm_source=news&id=42",
                CleaningMode::Smart
            ),
            "https://example.com/page?id=42"
        );
    }

    #[test]
    fn test_smart_keeps_unknown_params() {
        assert_eq!(
            clean_url(
                "https://shop.example.com/item?sku=9&fbclid=abc&color=red",
                CleaningMode::Smart
            ),
            "https://shop.example.com/item?sku=9&color=red"
        );
    }

    #[test]
    fn test_smart_preserves_fragment() {
        assert_eq!(
            clean_url(
                "https://example.com/a?b=1&utm_medium=x#frag",
                CleaningMode::Smart
            ),
            "https://example.com/a?b=1#frag"
        );
    }

    #[test]
    fn test_smart_removes_empty_query() {
        assert_eq!(
            clean_url(
                "https://example.com/a?utm_source=x&utm_campaign=y",
                CleaningMode::Smart
            ),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_smart_untouched_when_nothing_removed() {
        let url = "https://example.com/search?q=a%20b&page=2";
        assert_eq!(clean_url(url, CleaningMode::Smart), url);
    }

    #[test]
    fn test_smart_case_insensitive_names() {
        assert_eq!(
            clean_url("https://example.com/?UTM_Source=x&ID=1", CleaningMode::Smart),
            "https://example.com/?ID=1"
        );
    }

    #[test]
    fn test_aggressive_strips_query_and_fragment() {
        for url in SAMPLE_URLS {
            let cleaned = clean_url(url, CleaningMode::Aggressive);
            assert!(!cleaned.contains('?'), "{cleaned}");
            assert!(!cleaned.contains('#'), "{cleaned}");
        }

        assert_eq!(
            clean_url("http://example.com:8080/path?q=rust&gclid=1", CleaningMode::Aggressive),
            "http://example.com:8080/path"
        );
    }

    #[test]
    fn test_idempotent() {
        for mode in [CleaningMode::Smart, CleaningMode::Aggressive] {
            for url in SAMPLE_URLS {
                let once = clean_url(url, mode);
                assert_eq!(clean_url(&once, mode), once, "mode {mode} url {url}");
            }
        }
    }

    #[test]
    fn test_malformed_input_returned_unchanged() {
        for mode in CleaningMode::ALL {
            assert_eq!(clean_url("not a valid url", mode), "not a valid url");
            assert_eq!(clean_url("", mode), "");
        }
    }

    #[test]
    fn test_functional_params_always_kept() {
        for name in FUNCTIONAL_PARAMS {
            for mode in CleaningMode::ALL {
                assert!(should_keep_param(name, mode), "{name} in {mode}");
            }
        }
    }

    #[test]
    fn test_tracking_params_always_dropped() {
        for name in TRACKING_PARAMS {
            for mode in [CleaningMode::Smart, CleaningMode::Aggressive] {
                assert!(!should_keep_param(name, mode), "{name} in {mode}");
            }
        }
    }

    #[test]
    fn test_lists_do_not_overlap() {
        for name in TRACKING_PARAMS {
            assert!(!FUNCTIONAL_PARAMS.contains(name), "{name}");
        }
    }

    #[test]
    fn test_unknown_param_depends_on_mode() {
        assert!(should_keep_param("color", CleaningMode::Smart));
        assert!(!should_keep_param("color", CleaningMode::Aggressive));
    }

    #[test]
    fn test_is_shortenable() {
        assert!(is_shortenable("https://example.com/page"));
        assert!(is_shortenable("http://8.8.8.8/dns"));

        assert!(!is_shortenable("chrome://extensions"));
        assert!(!is_shortenable("file:///home/user/doc.txt"));
        assert!(!is_shortenable("http://localhost:3000"));
        assert!(!is_shortenable("http://127.0.0.1/"));
        assert!(!is_shortenable("http://192.168.1.10/router"));
        assert!(!is_shortenable("http://[::1]:8080/"));
        assert!(!is_shortenable("not a url"));
    }
}
