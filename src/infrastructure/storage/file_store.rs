//! JSON-file backed key-value store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::repositories::{KeyValueStore, StoreArea, StoreError, StoreResult};

/// Stores each key as `<data_dir>/<area>/<key>.json`.
///
/// Writes go to a temporary file that is then renamed over the target, so
/// a crash mid-write never leaves a truncated document behind. Calls on one
/// store are serialized by an internal lock.
pub struct JsonFileStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (and creates if needed) the directory for `area` under `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub async fn open(data_dir: impl AsRef<Path>, area: StoreArea) -> StoreResult<Self> {
        let dir = data_dir.as_ref().join(area.as_str());
        fs::create_dir_all(&dir).await?;

        debug!("Opened {} store at {}", area.as_str(), dir.display());

        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');

        if !valid {
            return Err(StoreError::Backend(format!("Invalid store key '{key}'")));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let path = self.path_for(key)?;
        let _guard = self.lock.lock().await;

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(&value).map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })?;

        let _guard = self.lock.lock().await;
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &path).await?;

        debug!("Stored document '{}'", key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let _guard = self.lock.lock().await;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn health_check(&self) -> bool {
        match fs::metadata(&self.dir).await {
            Ok(meta) => meta.is_dir(),
            Err(e) => {
                warn!("Store directory {} unavailable: {}", self.dir.display(), e);
                false
            }
        }
    }
}
