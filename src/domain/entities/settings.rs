//! User settings persisted in the sync store.

use super::cleaning::{CleaningMode, ShortUrlProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format of a single-tab copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CopyFormat {
    #[default]
    Url,
    Markdown,
    ShortUrl,
    /// Rendered from a template; the template id travels with the request.
    Custom,
}

impl CopyFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Markdown => "markdown",
            Self::ShortUrl => "shortUrl",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for CopyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CopyFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "url" => Ok(Self::Url),
            "markdown" | "md" => Ok(Self::Markdown),
            "shorturl" | "short-url" | "short" => Ok(Self::ShortUrl),
            "custom" | "template" => Ok(Self::Custom),
            other => Err(format!(
                "unknown copy format '{other}' (expected: url, markdown, short-url, template)"
            )),
        }
    }
}

/// Persisted user preferences.
///
/// Missing fields fall back to their defaults so older documents keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub url_cleaning: CleaningMode,
    pub short_url_service: ShortUrlProvider,
    pub silent_copy_format: CopyFormat,
    pub notifications_enabled: bool,
    pub analytics_enabled: bool,
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url_cleaning: CleaningMode::Smart,
            short_url_service: ShortUrlProvider::Isgd,
            silent_copy_format: CopyFormat::Url,
            notifications_enabled: true,
            analytics_enabled: true,
            language: "en".to_string(),
        }
    }
}

/// Partial settings update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub url_cleaning: Option<CleaningMode>,
    pub short_url_service: Option<ShortUrlProvider>,
    pub silent_copy_format: Option<CopyFormat>,
    pub notifications_enabled: Option<bool>,
    pub analytics_enabled: Option<bool>,
    pub language: Option<String>,
}

impl SettingsPatch {
    pub fn apply_to(self, settings: &mut Settings) {
        if let Some(mode) = self.url_cleaning {
            settings.url_cleaning = mode;
        }
        if let Some(provider) = self.short_url_service {
            settings.short_url_service = provider;
        }
        if let Some(format) = self.silent_copy_format {
            settings.silent_copy_format = format;
        }
        if let Some(enabled) = self.notifications_enabled {
            settings.notifications_enabled = enabled;
        }
        if let Some(enabled) = self.analytics_enabled {
            settings.analytics_enabled = enabled;
        }
        if let Some(language) = self.language {
            settings.language = language;
        }
    }
}
