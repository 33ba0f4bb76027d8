//! Short-URL cache.
//!
//! Provides a [`CacheService`] trait with two implementations:
//! - [`PersistentCache`] - Collection persisted in a key-value store
//! - [`NullCache`] - No-op implementation for disabled caching

mod null_cache;
mod persistent_cache;
mod service;

pub use null_cache::NullCache;
pub use persistent_cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL, PersistentCache};
pub use service::{CacheError, CacheResult, CacheService, CacheStats};

#[cfg(test)]
pub use service::MockCacheService;
