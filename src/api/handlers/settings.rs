//! Handlers for settings endpoints.

use axum::{Json, extract::State};

use crate::domain::entities::{Settings, SettingsPatch};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/settings`
pub async fn get_settings_handler(State(state): State<AppState>) -> Json<Settings> {
    Json(state.settings_service.load().await)
}

/// Applies a partial settings update and returns the stored result.
///
/// # Endpoint
///
/// `PUT /api/settings`
///
/// Fields left out of the body keep their current value.
pub async fn update_settings_handler(
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<Settings>, AppError> {
    let settings = state.settings_service.update(patch).await?;
    Ok(Json(settings))
}
