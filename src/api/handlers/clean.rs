//! Handler for the URL cleaning endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::clean::{CleanRequest, CleanResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_cleaner::clean_url;

/// Strips tracking parameters from a URL.
///
/// # Endpoint
///
/// `POST /api/clean`
///
/// Unparseable input is returned unchanged with `changed: false`.
pub async fn clean_handler(
    State(state): State<AppState>,
    Json(payload): Json<CleanRequest>,
) -> Result<Json<CleanResponse>, AppError> {
    payload.validate()?;

    let mode = match payload.mode {
        Some(mode) => mode,
        None => state.settings_service.load().await.url_cleaning,
    };

    let cleaned = clean_url(&payload.url, mode);

    Ok(Json(CleanResponse {
        changed: cleaned != payload.url,
        original: payload.url,
        cleaned,
        mode,
    }))
}
