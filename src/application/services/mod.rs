//! Business logic services for the application layer.

pub mod analytics_tracker;
pub mod copy_service;
pub mod settings_service;
pub mod short_url_service;
pub mod template_service;

pub use analytics_tracker::AnalyticsTracker;
pub use copy_service::{
    BatchFormat, BatchOptions, BatchOutcome, CopyOutcome, CopyRequest, CopyService,
};
pub use settings_service::SettingsService;
pub use short_url_service::{ShortUrl, ShortUrlService};
pub use template_service::{TemplateOutcome, TemplateService};
