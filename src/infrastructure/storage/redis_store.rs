//! Redis-backed key-value store.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::repositories::{KeyValueStore, StoreArea, StoreError, StoreResult};

/// Stores each document as a JSON string under `arclet:<area>:<key>`.
///
/// Uses connection pooling via `ConnectionManager`. Unlike the short-URL
/// cache, store errors propagate so callers can decide on a fallback.
#[derive(Clone)]
pub struct RedisStore {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, area: StoreArea) -> StoreResult<Self> {
        info!("Connecting to Redis store");

        let client = Client::open(redis_url)
            .map_err(|e| StoreError::Backend(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Backend(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis ({} area)", area.as_str());

        Ok(Self {
            client: manager,
            key_prefix: Self::prefix(area),
        })
    }

    /// Returns a store for another area sharing this connection.
    pub fn for_area(&self, area: StoreArea) -> Self {
        Self {
            client: self.client.clone(),
            key_prefix: Self::prefix(area),
        }
    }

    fn prefix(area: StoreArea) -> String {
        format!("arclet:{}:", area.as_str())
    }

    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let full_key = self.build_key(key);
        let mut conn = self.client.clone();

        let raw = conn
            .get::<_, Option<String>>(&full_key)
            .await
            .map_err(|e| StoreError::Backend(format!("Redis GET {}: {}", full_key, e)))?;

        match raw {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        let full_key = self.build_key(key);
        let mut conn = self.client.clone();

        conn.set::<_, _, ()>(&full_key, value.to_string())
            .await
            .map_err(|e| StoreError::Backend(format!("Redis SET {}: {}", full_key, e)))?;

        debug!("Redis SET: {}", full_key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let full_key = self.build_key(key);
        let mut conn = self.client.clone();

        conn.del::<_, i32>(&full_key)
            .await
            .map_err(|e| StoreError::Backend(format!("Redis DEL {}: {}", full_key, e)))?;

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
