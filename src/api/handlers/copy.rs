//! Handlers for copy endpoints.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::copy::{BatchCopyRequest, CopyTabRequest};
use crate::application::services::{BatchOutcome, CopyOutcome};
use crate::error::AppError;
use crate::state::AppState;

/// Copies one tab in the requested (or configured) format.
///
/// # Endpoint
///
/// `POST /api/copy`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/?utm_source=x",
///   "title": "Example",
///   "format": "markdown"
/// }
/// ```
///
/// # Response
///
/// Always 200 once the request is valid; `success` reports whether the
/// text reached a clipboard and `fallback` whether the cleaned URL was
/// copied instead of the requested format.
pub async fn copy_handler(
    State(state): State<AppState>,
    Json(payload): Json<CopyTabRequest>,
) -> Result<Json<CopyOutcome>, AppError> {
    payload.validate()?;

    let outcome = state.copy_service.copy(payload.into()).await;
    Ok(Json(outcome))
}

/// Copies many tabs as one block of text.
///
/// # Endpoint
///
/// `POST /api/copy/batch`
///
/// With `shortUrls: true` every URL goes through the shared request
/// throttle; progress is logged at debug level.
pub async fn copy_batch_handler(
    State(state): State<AppState>,
    Json(payload): Json<BatchCopyRequest>,
) -> Result<Json<BatchOutcome>, AppError> {
    payload.validate()?;

    let (tabs, options) = payload.into_parts();
    let outcome = state.copy_service.copy_batch(tabs, options, None).await;
    Ok(Json(outcome))
}
