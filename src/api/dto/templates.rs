//! DTOs for template endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{CleaningMode, NewTemplate, Template, TemplatePatch};

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub count: usize,
    pub templates: Vec<Template>,
}

/// Request to create a custom template.
///
/// The template text itself is checked by the template validator.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,

    #[validate(length(max = 16))]
    pub icon: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "Template must be 1-2000 characters"))]
    pub template_text: String,
}

impl From<CreateTemplateRequest> for NewTemplate {
    fn from(req: CreateTemplateRequest) -> Self {
        NewTemplate {
            name: req.name,
            icon: req.icon,
            template_text: req.template_text,
        }
    }
}

/// Partial update of a custom template.
///
/// `icon` distinguishes a missing field (keep) from `null` (reset to the
/// default icon).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(length(max = 16))]
    pub icon: Option<Option<String>>,

    #[validate(length(min = 1, max = 2000, message = "Template must be 1-2000 characters"))]
    pub template_text: Option<String>,
}

impl From<UpdateTemplateRequest> for TemplatePatch {
    fn from(req: UpdateTemplateRequest) -> Self {
        TemplatePatch {
            name: req.name,
            icon: req.icon.map(Option::unwrap_or_default),
            template_text: req.template_text,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTemplateRequest {
    pub template_text: String,
}

/// Render either a stored template (`templateId`) or ad-hoc text
/// (`templateText`) against a tab.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenderTemplateRequest {
    pub template_id: Option<String>,

    pub template_text: Option<String>,

    #[validate(length(min = 1, message = "URL cannot be empty"))]
    pub url: String,

    #[serde(default)]
    pub title: String,

    pub url_cleaning: Option<CleaningMode>,

    /// Value for `{{shortUrl}}`; the cleaned URL is used when absent.
    #[validate(url(message = "Invalid short URL"))]
    pub short_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateChangedResponse {
    pub acknowledged: bool,
    pub template_count: usize,
}
