//! Handler for the short-URL endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::short_url::ShortUrlRequest;
use crate::application::services::ShortUrl;
use crate::error::AppError;
use crate::state::AppState;

/// Returns a short URL for a page, creating one when it is not cached.
///
/// # Endpoint
///
/// `POST /api/short-url`
///
/// # Response
///
/// ```json
/// {
///   "shortUrl": "https://is.gd/abc123",
///   "cleanedUrl": "https://example.com/article",
///   "provider": "isgd",
///   "cached": false
/// }
/// ```
///
/// # Errors
///
/// - 400 if the URL is invalid or cannot be shortened (localhost, non-http)
/// - 502 if the short-URL service fails
pub async fn short_url_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortUrlRequest>,
) -> Result<Json<ShortUrl>, AppError> {
    payload.validate()?;

    let settings = state.settings_service.load().await;
    let provider = payload
        .short_url_service
        .unwrap_or(settings.short_url_service);
    let mode = payload.url_cleaning.unwrap_or(settings.url_cleaning);

    let short_url = state
        .short_url_service
        .get_or_create(&payload.url, provider, mode)
        .await?;

    Ok(Json(short_url))
}
