//! Template CRUD and rendering.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{
    CleaningMode, DEFAULT_TEMPLATE_ICON, NewTemplate, Template, TemplatePatch, preset_templates,
};
use crate::domain::repositories::{KeyValueStore, keys, load, save};
use crate::error::AppError;
use crate::utils::id_generator::{generate_template_id, is_custom_template_id};
use crate::utils::template_engine::{TemplateContext, render, validate};
use crate::utils::url_cleaner::clean_url;

/// Longest accepted template name.
const MAX_NAME_LENGTH: usize = 50;

/// Result of [`TemplateService::process_template_with_fallback`].
///
/// `success == false` means `content` is the cleaned URL instead of the
/// rendered template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOutcome {
    pub success: bool,
    pub content: String,
    pub template_name: Option<String>,
    pub error: Option<String>,
}

/// Manages preset and custom templates.
///
/// Custom templates live as one ordered list under
/// [`keys::CUSTOM_TEMPLATES`] in the sync store.
pub struct TemplateService {
    store: Arc<dyn KeyValueStore>,
}

impl TemplateService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Custom templates in stored order.
    pub async fn list_custom(&self) -> Result<Vec<Template>, AppError> {
        Ok(load::<Vec<Template>>(self.store.as_ref(), keys::CUSTOM_TEMPLATES)
            .await?
            .unwrap_or_default())
    }

    /// Presets followed by custom templates.
    pub async fn list_all(&self) -> Result<Vec<Template>, AppError> {
        let mut templates = preset_templates();
        templates.extend(self.list_custom().await?);
        Ok(templates)
    }

    /// Looks up a preset or custom template by id.
    pub async fn find(&self, id: &str) -> Result<Option<Template>, AppError> {
        if let Some(preset) = preset_templates().into_iter().find(|t| t.id == id) {
            return Ok(Some(preset));
        }

        Ok(self.list_custom().await?.into_iter().find(|t| t.id == id))
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no template has this id.
    pub async fn get(&self, id: &str) -> Result<Template, AppError> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::not_found("Template not found", json!({ "id": id })))
    }

    /// Creates a custom template after validating name and text.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with the validator's errors if the
    /// template text is invalid, or if the name is blank or too long.
    pub async fn create(&self, new: NewTemplate) -> Result<Template, AppError> {
        let name = validate_name(&new.name)?;
        validate_text(&new.template_text)?;

        let template = Template {
            id: generate_template_id(),
            name,
            icon: new
                .icon
                .filter(|icon| !icon.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TEMPLATE_ICON.to_string()),
            template_text: new.template_text,
            is_preset: false,
            created_at: Utc::now().timestamp_millis(),
            last_used: None,
            usage_count: 0,
        };

        let mut templates = self.list_custom().await?;
        templates.push(template.clone());
        save(self.store.as_ref(), keys::CUSTOM_TEMPLATES, &templates).await?;

        debug!("Created template {} ({})", template.id, template.name);
        Ok(template)
    }

    /// Applies a partial update to a custom template.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an empty patch or invalid fields
    /// - [`AppError::Conflict`] when targeting a preset
    /// - [`AppError::NotFound`] if the id does not exist
    pub async fn update(&self, id: &str, patch: TemplatePatch) -> Result<Template, AppError> {
        if patch.is_empty() {
            return Err(AppError::bad_request(
                "No fields to update",
                json!({ "id": id }),
            ));
        }
        self.ensure_custom(id)?;

        let mut templates = self.list_custom().await?;
        let template = templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found("Template not found", json!({ "id": id })))?;

        if let Some(name) = patch.name {
            template.name = validate_name(&name)?;
        }
        if let Some(text) = patch.template_text {
            validate_text(&text)?;
            template.template_text = text;
        }
        if let Some(icon) = patch.icon {
            template.icon = if icon.trim().is_empty() {
                DEFAULT_TEMPLATE_ICON.to_string()
            } else {
                icon
            };
        }

        let updated = template.clone();
        save(self.store.as_ref(), keys::CUSTOM_TEMPLATES, &templates).await?;

        Ok(updated)
    }

    /// Deletes a custom template.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the id does not exist and
    /// [`AppError::Conflict`] for presets.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.ensure_custom(id)?;

        let mut templates = self.list_custom().await?;
        let before = templates.len();
        templates.retain(|t| t.id != id);

        if templates.len() == before {
            return Err(AppError::not_found(
                "Template not found",
                json!({ "id": id }),
            ));
        }

        save(self.store.as_ref(), keys::CUSTOM_TEMPLATES, &templates).await?;
        debug!("Deleted template {}", id);
        Ok(())
    }

    /// Bumps `usageCount` and sets `lastUsed` on a custom template.
    ///
    /// Presets and unknown ids are ignored.
    pub async fn record_usage(&self, id: &str) -> Result<(), AppError> {
        if !is_custom_template_id(id) {
            return Ok(());
        }

        let mut templates = self.list_custom().await?;
        let Some(template) = templates.iter_mut().find(|t| t.id == id) else {
            return Ok(());
        };

        template.usage_count = template.usage_count.saturating_add(1);
        template.last_used = Some(Utc::now().timestamp_millis());

        save(self.store.as_ref(), keys::CUSTOM_TEMPLATES, &templates).await?;
        Ok(())
    }

    /// Renders template `id`, degrading to the cleaned URL on any failure.
    ///
    /// Never returns an error: a missing template or a storage failure
    /// yields `success: false` with the cleaned URL as content so the copy
    /// can still complete.
    pub async fn process_template_with_fallback(
        &self,
        id: &str,
        ctx: &TemplateContext,
    ) -> TemplateOutcome {
        let fallback = |error: String| TemplateOutcome {
            success: false,
            content: clean_url(&ctx.url, ctx.url_cleaning),
            template_name: None,
            error: Some(error),
        };

        let template = match self.find(id).await {
            Ok(Some(template)) => template,
            Ok(None) => {
                warn!("Template {} not found, copying URL instead", id);
                return fallback(format!("Template '{id}' not found"));
            }
            Err(e) => {
                warn!("Template lookup failed: {}", e);
                return fallback(e.message().to_string());
            }
        };

        let content = render(&template.template_text, ctx);

        if let Err(e) = self.record_usage(&template.id).await {
            warn!("Failed to record template usage: {}", e);
        }

        TemplateOutcome {
            success: true,
            content,
            template_name: Some(template.name),
            error: None,
        }
    }

    /// Number of presets plus custom templates.
    pub async fn count(&self) -> Result<usize, AppError> {
        Ok(preset_templates().len() + self.list_custom().await?.len())
    }

    fn ensure_custom(&self, id: &str) -> Result<(), AppError> {
        if preset_templates().iter().any(|t| t.id == id) {
            return Err(AppError::conflict(
                "Preset templates cannot be modified",
                json!({ "id": id }),
            ));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(AppError::bad_request(
            "Template name cannot be empty",
            json!({}),
        ));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::bad_request(
            format!("Template name must be at most {MAX_NAME_LENGTH} characters"),
            json!({ "name": name }),
        ));
    }

    Ok(name.to_string())
}

fn validate_text(text: &str) -> Result<(), AppError> {
    let validation = validate(text);
    if !validation.valid {
        return Err(AppError::bad_request(
            "Invalid template",
            json!({ "errors": validation.errors }),
        ));
    }
    Ok(())
}

/// Context for rendering a tab without a short URL.
pub fn context_for(url: &str, title: &str, mode: CleaningMode) -> TemplateContext {
    TemplateContext {
        url: url.to_string(),
        title: title.to_string(),
        url_cleaning: mode,
        short_url: None,
    }
}
