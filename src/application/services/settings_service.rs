//! Settings persistence.

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use crate::domain::entities::{Settings, SettingsPatch, ShortUrlProvider};
use crate::domain::repositories::{KeyValueStore, keys, load, save};
use crate::error::AppError;

/// Reads and writes [`Settings`] under [`keys::SETTINGS`] in the sync store.
pub struct SettingsService {
    store: Arc<dyn KeyValueStore>,
    defaults: Settings,
}

impl SettingsService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            defaults: Settings::default(),
        }
    }

    /// Uses `provider` as the short-URL service until settings are saved.
    pub fn with_default_provider(store: Arc<dyn KeyValueStore>, provider: ShortUrlProvider) -> Self {
        Self {
            store,
            defaults: Settings {
                short_url_service: provider,
                ..Settings::default()
            },
        }
    }

    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }

    /// Loads settings, falling back to defaults if the document is missing
    /// or unreadable.
    pub async fn load(&self) -> Settings {
        match load::<Settings>(self.store.as_ref(), keys::SETTINGS).await {
            Ok(Some(settings)) => settings,
            Ok(None) => self.defaults.clone(),
            Err(e) => {
                warn!("Failed to load settings, using defaults: {}", e);
                self.defaults.clone()
            }
        }
    }

    pub async fn save(&self, settings: &Settings) -> Result<(), AppError> {
        validate(settings)?;
        save(self.store.as_ref(), keys::SETTINGS, settings).await?;
        Ok(())
    }

    /// Applies `patch` to the stored settings and persists the result.
    pub async fn update(&self, patch: SettingsPatch) -> Result<Settings, AppError> {
        let mut settings = self.load().await;
        patch.apply_to(&mut settings);
        self.save(&settings).await?;
        Ok(settings)
    }

    pub async fn reset(&self) -> Result<Settings, AppError> {
        self.store.remove(keys::SETTINGS).await?;
        Ok(self.defaults.clone())
    }
}

fn validate(settings: &Settings) -> Result<(), AppError> {
    let language = settings.language.trim();
    let valid = !language.is_empty()
        && language.len() <= 16
        && language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if !valid {
        return Err(AppError::bad_request(
            "Invalid language code",
            json!({ "language": settings.language }),
        ));
    }
    Ok(())
}
