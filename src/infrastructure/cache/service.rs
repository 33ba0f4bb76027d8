//! Cache service trait and error types.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::entities::ShortUrlProvider;
use crate::domain::repositories::StoreError;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Snapshot of the cache collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub max_entries: usize,
    pub ttl_seconds: u64,
    /// Timestamp (epoch ms) of the oldest entry.
    pub oldest: Option<i64>,
    /// Timestamp (epoch ms) of the newest entry.
    pub newest: Option<i64>,
}

/// Trait for caching generated short URLs.
///
/// Keys are built from the provider and the **cleaned** URL. Lookups and
/// inserts are fail-open: storage failures are logged and degrade to a
/// cache miss so short-URL creation never fails because of the cache.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::PersistentCache`] - TTL + size-bounded collection in a key-value store
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a fresh short URL.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(short_url))` on a fresh hit
    /// - `Ok(None)` on miss, stale entry (which is removed) or storage error
    async fn get(
        &self,
        cleaned_url: &str,
        provider: ShortUrlProvider,
    ) -> CacheResult<Option<String>>;

    /// Stores a short URL, evicting the oldest entry when the collection is full.
    ///
    /// # Errors
    ///
    /// Should not propagate storage errors; they are logged instead.
    async fn set(
        &self,
        cleaned_url: &str,
        provider: ShortUrlProvider,
        short_url: &str,
    ) -> CacheResult<()>;

    /// Drops every expired entry and returns how many were removed.
    async fn cleanup(&self) -> CacheResult<usize>;

    /// Drops the whole collection.
    async fn clear(&self) -> CacheResult<()>;

    /// Reports collection size and age bounds.
    async fn stats(&self) -> CacheResult<CacheStats>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
