//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain and application
//! layers with concrete adapters.
//!
//! # Modules
//!
//! - [`storage`] - Key-value stores (JSON files, memory, Redis)
//! - [`cache`] - Persistent short-URL cache
//! - [`shortener`] - Short-URL service HTTP client
//! - [`analytics`] - Umami collector client
//! - [`clipboard`] - Clipboard writers
//! - [`notifier`] - Notification delivery

pub mod analytics;
pub mod cache;
pub mod clipboard;
pub mod notifier;
pub mod shortener;
pub mod storage;
