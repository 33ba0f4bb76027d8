//! # Arclet Copier
//!
//! Copy page URLs cleaned of tracking parameters, as Markdown links, short
//! links or user-defined templates.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities, the key-value store trait, analytics events
//! - **Application Layer** ([`application`]) - Copy, short-URL, template and settings services
//! - **Infrastructure Layer** ([`infrastructure`]) - Stores, cache, HTTP clients, clipboard
//! - **API Layer** ([`api`]) - Local message bus handlers, DTOs, and middleware
//!
//! The pure building blocks live in [`utils`]: the URL cleaner, the request
//! throttle and the template engine.
//!
//! ## Features
//!
//! - Tracking parameter removal in `smart` and `aggressive` modes
//! - Short links from is.gd, v.gd or TinyURL, cached for 24 hours
//! - Throttled short-URL requests shared by every caller in the process
//! - Preset and custom `{{field}}` templates
//! - Batch copy as text, Markdown, HTML, CSV or JSON
//! - Optional fire-and-forget usage analytics
//!
//! ## Quick Start
//!
//! ```bash
//! # Start the message bus on 127.0.0.1:7878
//! cargo run
//!
//! # Or use the CLI directly
//! cargo run --bin arclet -- copy "https://example.com/?utm_source=x" --format markdown
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;
pub mod telemetry;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        CopyService, SettingsService, ShortUrlService, TemplateService,
    };
    pub use crate::domain::entities::{
        CleaningMode, CopyFormat, Settings, ShortUrlProvider, TabInfo, Template,
    };
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
