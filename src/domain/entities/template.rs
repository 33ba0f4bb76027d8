//! Copy templates: user-authored strings with `{{field}}` placeholders.

use serde::{Deserialize, Serialize};

/// A copy template.
///
/// Custom templates are persisted in the sync store as an ordered list.
/// Presets are built in, read-only, and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub template_text: String,
    #[serde(default)]
    pub is_preset: bool,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    /// Last use in epoch milliseconds.
    #[serde(default)]
    pub last_used: Option<i64>,
    #[serde(default)]
    pub usage_count: u32,
}

impl Template {
    /// Whether rendering this template needs a short URL to be generated first.
    pub fn requires_short_url(&self) -> bool {
        self.template_text.contains("{{shortUrl}}")
    }
}

/// Input data for creating a custom template.
#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub name: String,
    pub icon: Option<String>,
    pub template_text: String,
}

/// Partial update for an existing custom template.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub template_text: Option<String>,
}

impl TemplatePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.icon.is_none() && self.template_text.is_none()
    }
}

/// Default icon for custom templates without one.
pub const DEFAULT_TEMPLATE_ICON: &str = "📝";

/// Built-in templates offered alongside custom ones.
pub fn preset_templates() -> Vec<Template> {
    [
        ("preset_markdown", "Markdown link", "🔗", "[{{title}}]({{url}})"),
        ("preset_html", "HTML link", "🌐", "<a href=\"{{url}}\">{{title}}</a>"),
        ("preset_title_url", "Title and URL", "📄", "{{title}} - {{url}}"),
        (
            "preset_citation",
            "Citation",
            "📚",
            "{{title}}. {{hostname}}. Retrieved {{date}}, from {{url}}",
        ),
        ("preset_short", "Short link with title", "✂️", "{{title}}: {{shortUrl}}"),
    ]
    .into_iter()
    .map(|(id, name, icon, text)| Template {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        template_text: text.to_string(),
        is_preset: true,
        created_at: 0,
        last_used: None,
        usage_count: 0,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_marked_and_unique() {
        let presets = preset_templates();
        assert_eq!(presets.len(), 5);
        assert!(presets.iter().all(|t| t.is_preset));

        let mut ids: Vec<_> = presets.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), presets.len());
    }

    #[test]
    fn test_requires_short_url() {
        let presets = preset_templates();
        let short = presets.iter().find(|t| t.id == "preset_short").unwrap();
        let markdown = presets.iter().find(|t| t.id == "preset_markdown").unwrap();

        assert!(short.requires_short_url());
        assert!(!markdown.requires_short_url());
    }

    #[test]
    fn test_template_serde_uses_camel_case() {
        let json = serde_json::json!({
            "id": "custom_1",
            "name": "Mine",
            "templateText": "{{url}}",
            "createdAt": 1700000000000i64
        });

        let template: Template = serde_json::from_value(json).unwrap();
        assert_eq!(template.template_text, "{{url}}");
        assert_eq!(template.usage_count, 0);
        assert!(template.last_used.is_none());
        assert!(!template.is_preset);

        let back = serde_json::to_value(&template).unwrap();
        assert!(back.get("templateText").is_some());
        assert!(back.get("usageCount").is_some());
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(TemplatePatch::default().is_empty());
        let patch = TemplatePatch {
            name: Some("x".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
