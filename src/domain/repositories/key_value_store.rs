//! Whole-document key-value persistence.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Errors raised by key-value stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored document for '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Logical storage areas.
///
/// `Sync` holds small user-facing documents (settings, custom templates);
/// `Local` holds larger machine-local blobs (short-URL cache, analytics id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreArea {
    Sync,
    Local,
}

impl StoreArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Local => "local",
        }
    }
}

/// Store keys shared by every context that touches persisted state.
pub mod keys {
    pub const SETTINGS: &str = "settings";
    pub const CUSTOM_TEMPLATES: &str = "customTemplates";
    pub const SHORT_URL_CACHE: &str = "shortUrlCache";
    pub const ANALYTICS_USER_ID: &str = "analyticsUserId";
}

/// A key-value store exposing only whole-document get/set by key.
///
/// There are no partial-update semantics: callers read a document, mutate
/// it in memory and write it back. Individual calls are serialized by the
/// implementation, read-modify-write cycles are not.
///
/// # Implementations
///
/// - [`crate::infrastructure::storage::JsonFileStore`] - One JSON file per key
/// - [`crate::infrastructure::storage::MemoryStore`] - In-process map
/// - [`crate::infrastructure::storage::RedisStore`] - Redis strings
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the document stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Replaces the document stored under `key`.
    async fn set(&self, key: &str, value: Value) -> StoreResult<()>;

    /// Deletes the document stored under `key`. Missing keys are not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Checks whether the backend is reachable.
    async fn health_check(&self) -> bool;
}

/// Reads and deserializes a typed document.
///
/// # Errors
///
/// Returns [`StoreError::Corrupt`] if the stored JSON does not match `T`.
pub async fn load<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StoreResult<Option<T>> {
    match store.get(key).await? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Serializes and writes a typed document.
pub async fn save<T: Serialize + Sync>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let value = serde_json::to_value(value).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    store.set(key, value).await
}
