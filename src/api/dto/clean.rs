//! DTOs for the URL cleaning endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::CleaningMode;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CleanRequest {
    #[validate(length(min = 1, message = "URL cannot be empty"))]
    pub url: String,

    /// Defaults to the stored setting.
    pub mode: Option<CleaningMode>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanResponse {
    pub original: String,
    pub cleaned: String,
    pub mode: CleaningMode,
    pub changed: bool,
}
