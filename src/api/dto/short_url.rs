//! DTOs for the short-URL endpoint.

use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::{CleaningMode, ShortUrlProvider};

/// Request to create (or fetch a cached) short URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    /// Defaults to the stored setting.
    pub short_url_service: Option<ShortUrlProvider>,

    /// Defaults to the stored setting.
    pub url_cleaning: Option<CleaningMode>,
}
