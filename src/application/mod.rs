//! Application layer services implementing the copier's actions.
//!
//! Services consume the storage, cache, shortener, clipboard and notifier
//! traits and expose operations for the message bus and the CLI.
//!
//! # Available Services
//!
//! - [`services::ShortUrlService`] - Cached, throttled short-URL creation
//! - [`services::TemplateService`] - Template CRUD and fallback rendering
//! - [`services::SettingsService`] - Settings persistence
//! - [`services::CopyService`] - Single and batch copy orchestration
//! - [`services::AnalyticsTracker`] - Fire-and-forget event recording

pub mod services;
