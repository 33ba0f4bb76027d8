//! Short-URL cache persisted as one collection in a key-value store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use super::service::{CacheResult, CacheService, CacheStats};
use crate::domain::entities::{CacheEntry, ShortUrlProvider, cache_key};
use crate::domain::repositories::{KeyValueStore, StoreError, keys, load, save};

/// Entries older than this are treated as missing.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Collection size at which the oldest entry is evicted before an insert.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

type Collection = HashMap<String, CacheEntry>;

/// TTL and size-bounded short-URL cache.
///
/// The whole collection lives under [`keys::SHORT_URL_CACHE`] and every
/// operation is a read-modify-write of that document. The cycle is not
/// atomic: two concurrent misses for the same key both call the shortener
/// and the second write wins. That costs one duplicate request and never
/// corrupts the collection.
pub struct PersistentCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
    max_entries: usize,
}

impl PersistentCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_limits(store, DEFAULT_TTL, DEFAULT_MAX_ENTRIES)
    }

    /// Creates a cache with custom limits. `max_entries` is clamped to at least 1.
    pub fn with_limits(store: Arc<dyn KeyValueStore>, ttl: Duration, max_entries: usize) -> Self {
        Self {
            store,
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    fn ttl_ms(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }

    async fn load_collection(&self) -> Result<Collection, StoreError> {
        Ok(load::<Collection>(self.store.as_ref(), keys::SHORT_URL_CACHE)
            .await?
            .unwrap_or_default())
    }

    async fn save_collection(&self, collection: &Collection) -> Result<(), StoreError> {
        save(self.store.as_ref(), keys::SHORT_URL_CACHE, collection).await
    }
}

/// Removes the entry with the smallest timestamp.
fn evict_oldest(collection: &mut Collection) -> Option<String> {
    let oldest = collection
        .iter()
        .min_by_key(|(_, entry)| entry.timestamp)
        .map(|(key, _)| key.clone())?;

    collection.remove(&oldest);
    Some(oldest)
}

#[async_trait]
impl CacheService for PersistentCache {
    async fn get(
        &self,
        cleaned_url: &str,
        provider: ShortUrlProvider,
    ) -> CacheResult<Option<String>> {
        let key = cache_key(provider, cleaned_url);

        let mut collection = match self.load_collection().await {
            Ok(collection) => collection,
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                return Ok(None);
            }
        };

        let now = Utc::now().timestamp_millis();
        match collection.get(&key) {
            Some(entry) if entry.is_fresh(now, self.ttl_ms()) => {
                metrics::counter!("short_url_cache_hits_total").increment(1);
                debug!("Cache HIT: {} -> {}", key, entry.short_url);
                Ok(Some(entry.short_url.clone()))
            }
            Some(_) => {
                collection.remove(&key);
                if let Err(e) = self.save_collection(&collection).await {
                    warn!("Failed to drop stale cache entry {}: {}", key, e);
                }
                metrics::counter!("short_url_cache_misses_total").increment(1);
                debug!("Cache STALE: {}", key);
                Ok(None)
            }
            None => {
                metrics::counter!("short_url_cache_misses_total").increment(1);
                debug!("Cache MISS: {}", key);
                Ok(None)
            }
        }
    }

    async fn set(
        &self,
        cleaned_url: &str,
        provider: ShortUrlProvider,
        short_url: &str,
    ) -> CacheResult<()> {
        let key = cache_key(provider, cleaned_url);

        let mut collection = match self.load_collection().await {
            Ok(collection) => collection,
            Err(StoreError::Corrupt { .. }) => {
                warn!("Short-URL cache document is corrupt, starting over");
                Collection::new()
            }
            Err(e) => {
                warn!("Cache write skipped for {}: {}", key, e);
                return Ok(());
            }
        };

        if !collection.contains_key(&key) && collection.len() >= self.max_entries {
            if let Some(evicted) = evict_oldest(&mut collection) {
                metrics::counter!("short_url_cache_evictions_total").increment(1);
                debug!("Cache EVICT: {}", evicted);
            }
        }

        collection.insert(
            key.clone(),
            CacheEntry::new(short_url, Utc::now().timestamp_millis()),
        );

        match self.save_collection(&collection).await {
            Ok(()) => debug!("Cache SET: {} -> {}", key, short_url),
            Err(e) => warn!("Cache write failed for {}: {}", key, e),
        }

        Ok(())
    }

    async fn cleanup(&self) -> CacheResult<usize> {
        let mut collection = self.load_collection().await?;
        let now = Utc::now().timestamp_millis();
        let ttl_ms = self.ttl_ms();

        let before = collection.len();
        collection.retain(|_, entry| entry.is_fresh(now, ttl_ms));
        let removed = before - collection.len();

        if removed > 0 {
            self.save_collection(&collection).await?;
        }

        debug!("Cache cleanup removed {} entries", removed);
        Ok(removed)
    }

    async fn clear(&self) -> CacheResult<()> {
        self.store.remove(keys::SHORT_URL_CACHE).await?;
        debug!("Cache cleared");
        Ok(())
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        let collection = self.load_collection().await?;

        Ok(CacheStats {
            entries: collection.len(),
            max_entries: self.max_entries,
            ttl_seconds: self.ttl.as_secs(),
            oldest: collection.values().map(|e| e.timestamp).min(),
            newest: collection.values().map(|e| e.timestamp).max(),
        })
    }

    async fn health_check(&self) -> bool {
        self.store.health_check().await
    }
}
