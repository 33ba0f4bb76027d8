//! Shared application state injected into message handlers.

use std::sync::Arc;

use crate::application::services::{
    AnalyticsTracker, CopyService, SettingsService, ShortUrlService, TemplateService,
};
use crate::domain::repositories::KeyValueStore;
use crate::infrastructure::cache::CacheService;

/// Services and backends shared by every handler.
///
/// Cloning is cheap; all fields are reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub copy_service: Arc<CopyService>,
    pub short_url_service: Arc<ShortUrlService>,
    pub template_service: Arc<TemplateService>,
    pub settings_service: Arc<SettingsService>,
    pub analytics: AnalyticsTracker,
    /// Sync-area store, checked by `/health`.
    pub store: Arc<dyn KeyValueStore>,
    pub cache: Arc<dyn CacheService>,
}
