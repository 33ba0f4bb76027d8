//! Handlers for short-URL cache maintenance.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::cache::CleanupResponse;
use crate::error::AppError;
use crate::infrastructure::cache::CacheStats;
use crate::state::AppState;

/// `GET /api/cache`
pub async fn cache_stats_handler(
    State(state): State<AppState>,
) -> Result<Json<CacheStats>, AppError> {
    Ok(Json(state.short_url_service.cache_stats().await?))
}

/// Removes expired entries.
///
/// `POST /api/cache/cleanup`
pub async fn cache_cleanup_handler(
    State(state): State<AppState>,
) -> Result<Json<CleanupResponse>, AppError> {
    let removed = state.short_url_service.cleanup_cache().await?;
    Ok(Json(CleanupResponse { removed }))
}

/// Drops every cached short URL.
///
/// `DELETE /api/cache` returns 204 No Content.
pub async fn cache_clear_handler(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.short_url_service.clear_cache().await?;
    tracing::info!("Short URL cache cleared");
    Ok(StatusCode::NO_CONTENT)
}
