//! API route configuration.

use crate::api::handlers::{
    cache_cleanup_handler, cache_clear_handler, cache_stats_handler, clean_handler,
    copy_batch_handler, copy_handler, create_template_handler, delete_template_handler,
    get_settings_handler, list_templates_handler, render_template_handler, short_url_handler,
    template_changed_handler, update_settings_handler, update_template_handler,
    validate_template_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// All API routes.
///
/// # Endpoints
///
/// - `POST   /copy`               - Copy one tab
/// - `POST   /copy/batch`         - Copy many tabs as one block
/// - `POST   /short-url`          - Create or fetch a cached short URL
/// - `POST   /clean`              - Strip tracking parameters
/// - `GET    /templates`          - List presets and custom templates
/// - `POST   /templates`          - Create a custom template
/// - `PATCH  /templates/{id}`     - Update a custom template
/// - `DELETE /templates/{id}`     - Delete a custom template
/// - `POST   /templates/validate` - Check template text
/// - `POST   /templates/render`   - Preview a template for a tab
/// - `POST   /templates/changed`  - Acknowledge a template change
/// - `GET    /settings`           - Current settings
/// - `PUT    /settings`           - Partial settings update
/// - `GET    /cache`              - Short-URL cache statistics
/// - `DELETE /cache`              - Clear the short-URL cache
/// - `POST   /cache/cleanup`      - Drop expired cache entries
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/copy", post(copy_handler))
        .route("/copy/batch", post(copy_batch_handler))
        .route("/short-url", post(short_url_handler))
        .route("/clean", post(clean_handler))
        .route(
            "/templates",
            get(list_templates_handler).post(create_template_handler),
        )
        .route("/templates/validate", post(validate_template_handler))
        .route("/templates/render", post(render_template_handler))
        .route("/templates/changed", post(template_changed_handler))
        .route(
            "/templates/{id}",
            patch(update_template_handler).delete(delete_template_handler),
        )
        .route(
            "/settings",
            get(get_settings_handler).put(update_settings_handler),
        )
        .route(
            "/cache",
            get(cache_stats_handler).delete(cache_clear_handler),
        )
        .route("/cache/cleanup", post(cache_cleanup_handler))
}
