//! DTOs for single and batch copy endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{BatchFormat, BatchOptions, CopyRequest};
use crate::domain::entities::{CleaningMode, CopyFormat, ShortUrlProvider, TabInfo};

/// A tab as sent by the caller.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TabItem {
    /// Copied even when it does not parse as a URL.
    #[validate(length(min = 1, message = "URL cannot be empty"))]
    pub url: String,

    #[serde(default)]
    pub title: String,
}

impl From<TabItem> for TabInfo {
    fn from(item: TabItem) -> Self {
        TabInfo::new(item.url, item.title)
    }
}

/// Request to copy one tab.
///
/// Options left out fall back to the stored settings.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CopyTabRequest {
    /// Copied even when it does not parse as a URL.
    #[validate(length(min = 1, message = "URL cannot be empty"))]
    pub url: String,

    #[serde(default)]
    pub title: String,

    pub format: Option<CopyFormat>,

    /// Required when `format` is `custom`.
    pub template_id: Option<String>,

    pub url_cleaning: Option<CleaningMode>,

    pub short_url_service: Option<ShortUrlProvider>,
}

impl From<CopyTabRequest> for CopyRequest {
    fn from(req: CopyTabRequest) -> Self {
        CopyRequest {
            tab: TabInfo::new(req.url, req.title),
            format: req.format,
            template_id: req.template_id,
            cleaning: req.url_cleaning,
            provider: req.short_url_service,
        }
    }
}

/// Request to copy many tabs at once.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BatchCopyRequest {
    #[validate(length(min = 1, max = 500, message = "Between 1 and 500 tabs required"))]
    #[validate(nested)]
    pub tabs: Vec<TabItem>,

    #[serde(default)]
    pub format: BatchFormat,

    #[serde(default)]
    pub dedupe: bool,

    #[serde(default)]
    pub short_urls: bool,

    pub url_cleaning: Option<CleaningMode>,

    pub short_url_service: Option<ShortUrlProvider>,
}

impl BatchCopyRequest {
    /// Splits the request into tabs and batch options.
    pub fn into_parts(self) -> (Vec<TabInfo>, BatchOptions) {
        let options = BatchOptions {
            format: self.format,
            dedupe: self.dedupe,
            short_urls: self.short_urls,
            cleaning: self.url_cleaning,
            provider: self.short_url_service,
        };
        let tabs = self.tabs.into_iter().map(TabInfo::from).collect();
        (tabs, options)
    }
}
