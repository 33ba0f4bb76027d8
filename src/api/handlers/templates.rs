//! Handlers for template management and rendering.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::templates::{
    CreateTemplateRequest, RenderTemplateRequest, TemplateChangedResponse, TemplateListResponse,
    UpdateTemplateRequest, ValidateTemplateRequest,
};
use crate::application::services::TemplateOutcome;
use crate::application::services::template_service::context_for;
use crate::domain::entities::Template;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::template_engine::{TemplateValidation, render, validate};

/// Lists presets followed by custom templates.
///
/// `GET /api/templates`
pub async fn list_templates_handler(
    State(state): State<AppState>,
) -> Result<Json<TemplateListResponse>, AppError> {
    let templates = state.template_service.list_all().await?;

    Ok(Json(TemplateListResponse {
        count: templates.len(),
        templates,
    }))
}

/// Creates a custom template.
///
/// # Endpoint
///
/// `POST /api/templates`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Citation",
///   "icon": "📚",
///   "templateText": "{{title}} ({{domain}}) {{url}}"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 with the validator's error list if the template is invalid.
pub async fn create_template_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<Template>), AppError> {
    payload.validate()?;

    let template = state.template_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// `PATCH /api/templates/{id}`
///
/// Presets answer 409 Conflict.
pub async fn update_template_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateTemplateRequest>,
) -> Result<Json<Template>, AppError> {
    payload.validate()?;

    let template = state.template_service.update(&id, payload.into()).await?;
    Ok(Json(template))
}

/// `DELETE /api/templates/{id}`
pub async fn delete_template_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.template_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Checks a template without saving it.
///
/// `POST /api/templates/validate` always answers 200; see `valid`.
pub async fn validate_template_handler(
    Json(payload): Json<ValidateTemplateRequest>,
) -> Json<TemplateValidation> {
    Json(validate(&payload.template_text))
}

/// Renders a stored template or ad-hoc text for a tab without copying.
///
/// # Endpoint
///
/// `POST /api/templates/render`
///
/// Exactly one of `templateId` and `templateText` must be set. Usage
/// statistics are not updated by a preview.
pub async fn render_template_handler(
    State(state): State<AppState>,
    Json(payload): Json<RenderTemplateRequest>,
) -> Result<Json<TemplateOutcome>, AppError> {
    payload.validate()?;

    let mode = match payload.url_cleaning {
        Some(mode) => mode,
        None => state.settings_service.load().await.url_cleaning,
    };
    let mut ctx = context_for(&payload.url, &payload.title, mode);
    ctx.short_url = payload.short_url;

    let (text, template_name) = match (payload.template_id, payload.template_text) {
        (Some(id), None) => {
            let template = state.template_service.get(&id).await?;
            (template.template_text, Some(template.name))
        }
        (None, Some(text)) => {
            let validation = validate(&text);
            if !validation.valid {
                return Err(AppError::bad_request(
                    "Invalid template",
                    json!({ "errors": validation.errors }),
                ));
            }
            (text, None)
        }
        _ => {
            return Err(AppError::bad_request(
                "Exactly one of templateId and templateText is required",
                json!({}),
            ));
        }
    };

    Ok(Json(TemplateOutcome {
        success: true,
        content: render(&text, &ctx),
        template_name,
        error: None,
    }))
}

/// Acknowledges that templates changed elsewhere and reports the current count.
///
/// `POST /api/templates/changed`
pub async fn template_changed_handler(
    State(state): State<AppState>,
) -> Result<Json<TemplateChangedResponse>, AppError> {
    let template_count = state.template_service.count().await?;
    tracing::debug!("Templates changed, {} available", template_count);

    Ok(Json(TemplateChangedResponse {
        acknowledged: true,
        template_count,
    }))
}
