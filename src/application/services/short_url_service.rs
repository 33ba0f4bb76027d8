//! Short-URL get-or-create service.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{CleaningMode, ShortUrlProvider};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CacheStats};
use crate::infrastructure::shortener::UrlShortener;
use crate::utils::throttle::RequestThrottle;
use crate::utils::url_cleaner::{clean_url, is_shortenable};

/// Result of [`ShortUrlService::get_or_create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrl {
    pub short_url: String,
    pub cleaned_url: String,
    pub provider: ShortUrlProvider,
    /// Whether the value came from the cache.
    pub cached: bool,
}

/// Creates short URLs through the shared throttle, backed by the cache.
///
/// One instance (and therefore one throttle) is shared by every caller in
/// the process.
pub struct ShortUrlService {
    shortener: Arc<dyn UrlShortener>,
    cache: Arc<dyn CacheService>,
    throttle: RequestThrottle,
}

impl ShortUrlService {
    pub fn new(
        shortener: Arc<dyn UrlShortener>,
        cache: Arc<dyn CacheService>,
        throttle: RequestThrottle,
    ) -> Self {
        Self {
            shortener,
            cache,
            throttle,
        }
    }

    pub fn throttle(&self) -> &RequestThrottle {
        &self.throttle
    }

    pub fn cache(&self) -> &Arc<dyn CacheService> {
        &self.cache
    }

    /// Returns a short URL for `url`, creating one if it is not cached.
    ///
    /// # Flow
    ///
    /// 1. Clean the URL with `mode`
    /// 2. Reject URLs a public service cannot shorten
    /// 3. Return a fresh cache entry if there is one
    /// 4. Call the shortener through the throttle
    /// 5. Cache and return the result
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for unshortenable URLs and
    /// [`AppError::Upstream`] when the service call fails.
    pub async fn get_or_create(
        &self,
        url: &str,
        provider: ShortUrlProvider,
        mode: CleaningMode,
    ) -> Result<ShortUrl, AppError> {
        let cleaned_url = clean_url(url.trim(), mode);

        if !is_shortenable(&cleaned_url) {
            return Err(AppError::bad_request(
                "URL cannot be shortened",
                json!({ "url": cleaned_url }),
            ));
        }

        match self.cache.get(&cleaned_url, provider).await {
            Ok(Some(short_url)) => {
                return Ok(ShortUrl {
                    short_url,
                    cleaned_url,
                    provider,
                    cached: true,
                });
            }
            Ok(None) => {}
            Err(e) => warn!("Cache lookup failed, continuing without cache: {}", e),
        }

        let shortener = Arc::clone(&self.shortener);
        let target = cleaned_url.clone();
        let result = self
            .throttle
            .schedule(move || async move { shortener.shorten(&target, provider).await })
            .await?;

        let short_url = result.inspect_err(|e| {
            metrics::counter!("short_url_failures_total", "provider" => provider.as_str())
                .increment(1);
            warn!(%provider, "Short URL creation failed: {}", e);
        })?;

        if let Err(e) = self.cache.set(&cleaned_url, provider, &short_url).await {
            warn!("Failed to cache short URL: {}", e);
        }

        debug!(%provider, "Created short URL {} for {}", short_url, cleaned_url);

        Ok(ShortUrl {
            short_url,
            cleaned_url,
            provider,
            cached: false,
        })
    }

    pub async fn cache_stats(&self) -> Result<CacheStats, AppError> {
        Ok(self.cache.stats().await?)
    }

    pub async fn cleanup_cache(&self) -> Result<usize, AppError> {
        Ok(self.cache.cleanup().await?)
    }

    pub async fn clear_cache(&self) -> Result<(), AppError> {
        Ok(self.cache.clear().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::{MockCacheService, PersistentCache};
    use crate::infrastructure::shortener::{MockUrlShortener, ShortenerError};
    use crate::infrastructure::storage::MemoryStore;
    use crate::utils::throttle::ThrottleConfig;
    use std::time::Duration;

    fn fast_throttle() -> RequestThrottle {
        RequestThrottle::new(ThrottleConfig {
            concurrency: 3,
            request_delay: Duration::from_millis(1),
            yield_delay: Duration::from_millis(1),
        })
    }

    fn service(shortener: MockUrlShortener) -> ShortUrlService {
        let cache = PersistentCache::new(Arc::new(MemoryStore::new()));
        ShortUrlService::new(Arc::new(shortener), Arc::new(cache), fast_throttle())
    }

    #[tokio::test]
    async fn test_creates_then_serves_from_cache() {
        let mut shortener = MockUrlShortener::new();
        shortener
            .expect_shorten()
            .withf(|url, provider| {
                url == "https://example.com/page?id=42" && *provider == ShortUrlProvider::Isgd
            })
            .times(1)
            .returning(|_, _| Ok("https://is.gd/abc".to_string()));

        let service = service(shortener);
        let url = "https://example.com/page?utm_source=news&id=42";

        let first = service
            .get_or_create(url, ShortUrlProvider::Isgd, CleaningMode::Smart)
            .await
            .unwrap();
        assert_eq!(first.short_url, "https://is.gd/abc");
        assert_eq!(first.cleaned_url, "https://example.com/page?id=42");
        assert!(!first.cached);

        let second = service
            .get_or_create(url, ShortUrlProvider::Isgd, CleaningMode::Smart)
            .await
            .unwrap();
        assert_eq!(second.short_url, "https://is.gd/abc");
        assert!(second.cached);
    }

    #[tokio::test]
    async fn test_cleaning_modes_use_separate_entries() {
        let mut shortener = MockUrlShortener::new();
        shortener
            .expect_shorten()
            .times(2)
            .returning(|url, _| Ok(format!("https://is.gd/{}", url.len())));

        let service = service(shortener);
        let url = "https://example.com/page?color=red";

        let smart = service
            .get_or_create(url, ShortUrlProvider::Isgd, CleaningMode::Smart)
            .await
            .unwrap();
        let aggressive = service
            .get_or_create(url, ShortUrlProvider::Isgd, CleaningMode::Aggressive)
            .await
            .unwrap();

        assert_ne!(smart.cleaned_url, aggressive.cleaned_url);
        assert_ne!(smart.short_url, aggressive.short_url);
    }

    #[tokio::test]
    async fn test_rejects_unshortenable_url() {
        let mut shortener = MockUrlShortener::new();
        shortener.expect_shorten().never();

        let service = service(shortener);
        let result = service
            .get_or_create("http://localhost:3000/x", ShortUrlProvider::Isgd, CleaningMode::Smart)
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_not_cached() {
        let mut shortener = MockUrlShortener::new();
        shortener.expect_shorten().times(2).returning(|_, provider| {
            Err(ShortenerError::InvalidResponse {
                provider,
                body: "Error: rate limited".to_string(),
            })
        });

        let service = service(shortener);
        for _ in 0..2 {
            let result = service
                .get_or_create("https://example.com", ShortUrlProvider::Vgd, CleaningMode::Off)
                .await;
            assert!(matches!(result, Err(AppError::Upstream { .. })));
        }
        assert_eq!(service.cache_stats().await.unwrap().entries, 0);
    }

    #[tokio::test]
    async fn test_cache_errors_do_not_block_creation() {
        let mut shortener = MockUrlShortener::new();
        shortener
            .expect_shorten()
            .times(1)
            .returning(|_, _| Ok("https://tinyurl.com/x".to_string()));

        let mut cache = MockCacheService::new();
        cache.expect_get().returning(|_, _| {
            Err(crate::domain::repositories::StoreError::Backend("down".to_string()).into())
        });
        cache.expect_set().returning(|_, _, _| Ok(()));

        let service = ShortUrlService::new(Arc::new(shortener), Arc::new(cache), fast_throttle());
        let result = service
            .get_or_create("https://example.com", ShortUrlProvider::Tinyurl, CleaningMode::Smart)
            .await
            .unwrap();

        assert_eq!(result.short_url, "https://tinyurl.com/x");
    }
}
