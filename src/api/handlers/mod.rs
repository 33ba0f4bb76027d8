//! Message handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod cache;
pub mod clean;
pub mod copy;
pub mod health;
pub mod settings;
pub mod short_url;
pub mod templates;

pub use cache::{cache_cleanup_handler, cache_clear_handler, cache_stats_handler};
pub use clean::clean_handler;
pub use copy::{copy_batch_handler, copy_handler};
pub use health::health_handler;
pub use settings::{get_settings_handler, update_settings_handler};
pub use short_url::short_url_handler;
pub use templates::{
    create_template_handler, delete_template_handler, list_templates_handler,
    render_template_handler, template_changed_handler, update_template_handler,
    validate_template_handler,
};
