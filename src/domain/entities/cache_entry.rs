//! Persisted short-URL cache records.

use super::cleaning::ShortUrlProvider;
use serde::{Deserialize, Serialize};

/// A cached short URL, keyed in its collection by [`cache_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub short_url: String,
    /// Insertion time in epoch milliseconds.
    pub timestamp: i64,
}

impl CacheEntry {
    pub fn new(short_url: impl Into<String>, timestamp: i64) -> Self {
        Self {
            short_url: short_url.into(),
            timestamp,
        }
    }

    /// Whether the entry is still fresh at `now_ms` for the given TTL.
    pub fn is_fresh(&self, now_ms: i64, ttl_ms: i64) -> bool {
        now_ms.saturating_sub(self.timestamp) < ttl_ms
    }
}

/// Builds the collection key `service:cleanedUrl`.
///
/// The URL must already be cleaned, so each cleaning mode yields its own entry.
pub fn cache_key(provider: ShortUrlProvider, cleaned_url: &str) -> String {
    format!("{}:{}", provider.as_str(), cleaned_url)
}
