//! Pure helpers shared by the services.
//!
//! - [`url_cleaner`] - Tracking-parameter removal and shortenability checks
//! - [`template_engine`] - `{{field}}` rendering and validation
//! - [`throttle`] - Bounded-concurrency request scheduler
//! - [`hostname`] - Host extraction from URLs
//! - [`id_generator`] - Custom template id generation

pub mod hostname;
pub mod id_generator;
pub mod template_engine;
pub mod throttle;
pub mod url_cleaner;
