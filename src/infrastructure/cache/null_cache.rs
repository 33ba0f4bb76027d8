//! No-op cache implementation for disabled caching.

use super::service::{CacheResult, CacheService, CacheStats};
use crate::domain::entities::ShortUrlProvider;
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when short-URL caching is disabled (`CACHE_MAX_ENTRIES=0` is
/// rejected, so this is only wired in explicitly, e.g. by tests or the CLI
/// `--no-cache` flag). Every lookup misses.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get(
        &self,
        _cleaned_url: &str,
        _provider: ShortUrlProvider,
    ) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set(
        &self,
        _cleaned_url: &str,
        _provider: ShortUrlProvider,
        _short_url: &str,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn cleanup(&self) -> CacheResult<usize> {
        Ok(0)
    }

    async fn clear(&self) -> CacheResult<()> {
        Ok(())
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        Ok(CacheStats::default())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
