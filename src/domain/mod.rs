//! Domain layer containing the copier's data model and persistence contracts.
//!
//! Nothing in this layer knows about HTTP, clipboards or concrete stores.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures (modes, templates, settings, cache entries)
//! - [`repositories`] - Key-value persistence trait
//! - [`analytics_event`] - Analytics event model
//! - [`analytics_worker`] - Background analytics delivery worker
//!
//! # Analytics Flow
//!
//! 1. A service records an action through the analytics tracker
//! 2. [`analytics_event::AnalyticsEvent`] is pushed onto a bounded channel (dropped if full)
//! 3. [`analytics_worker::run_analytics_worker`] delivers it with limited retries
//! 4. Failed deliveries are logged and dropped

pub mod analytics_event;
pub mod analytics_worker;
pub mod entities;
pub mod repositories;
