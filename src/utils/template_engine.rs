//! `{{field}}` placeholder substitution for copy templates.
//!
//! Rendering is lenient: unknown fields and fields that fail to resolve are
//! left in place as their original `{{name}}` token. Strictness lives in
//! [`validate`], which reports problems without failing.

use std::sync::LazyLock;

use chrono::{DateTime, Local, SecondsFormat, Utc};
use regex::Regex;
use serde::Serialize;

use crate::domain::entities::CleaningMode;
use crate::utils::hostname::{hostname_of, registrable_domain};
use crate::utils::url_cleaner::clean_url;

/// Matches a placeholder whose name is a plain identifier.
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Za-z][A-Za-z0-9_]*)\}\}").unwrap());

/// Matches anything between braces, used to report malformed names.
static ANY_PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]*)\}\}").unwrap());

static FIELD_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap());

/// Per-render input. Not persisted.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    pub url: String,
    pub title: String,
    pub url_cleaning: CleaningMode,
    pub short_url: Option<String>,
}

/// Fields a template may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateField {
    Url,
    OriginalUrl,
    Title,
    Hostname,
    Domain,
    ShortUrl,
    Date,
    Time,
    DateTime,
    Timestamp,
    Iso,
}

impl TemplateField {
    pub const ALL: [TemplateField; 11] = [
        Self::Url,
        Self::OriginalUrl,
        Self::Title,
        Self::Hostname,
        Self::Domain,
        Self::ShortUrl,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::Timestamp,
        Self::Iso,
    ];

    /// Looks up a field by its placeholder name (case-sensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::OriginalUrl => "originalUrl",
            Self::Title => "title",
            Self::Hostname => "hostname",
            Self::Domain => "domain",
            Self::ShortUrl => "shortUrl",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::Timestamp => "timestamp",
            Self::Iso => "iso",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Url => "URL cleaned with the active cleaning mode",
            Self::OriginalUrl => "URL exactly as the tab reported it",
            Self::Title => "Page title",
            Self::Hostname => "Host name, e.g. www.example.com",
            Self::Domain => "Host name without a leading www.",
            Self::ShortUrl => "Short URL (falls back to the cleaned URL)",
            Self::Date => "Current date, YYYY-MM-DD",
            Self::Time => "Current time, HH:MM:SS",
            Self::DateTime => "Current date and time",
            Self::Timestamp => "Milliseconds since the Unix epoch",
            Self::Iso => "Current UTC time in ISO 8601",
        }
    }

    /// Computes the field's value.
    ///
    /// Returns `None` when the value cannot be derived (e.g. no host in the URL).
    pub fn resolve(&self, ctx: &TemplateContext, now: DateTime<Local>) -> Option<String> {
        match self {
            Self::Url => Some(clean_url(&ctx.url, ctx.url_cleaning)),
            Self::OriginalUrl => Some(ctx.url.clone()),
            Self::Title => Some(ctx.title.clone()),
            Self::Hostname => hostname_of(&ctx.url),
            Self::Domain => hostname_of(&ctx.url).map(|host| registrable_domain(&host)),
            Self::ShortUrl => Some(
                ctx.short_url
                    .clone()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| clean_url(&ctx.url, ctx.url_cleaning)),
            ),
            Self::Date => Some(now.format("%Y-%m-%d").to_string()),
            Self::Time => Some(now.format("%H:%M:%S").to_string()),
            Self::DateTime => Some(now.format("%Y-%m-%d %H:%M:%S").to_string()),
            Self::Timestamp => Some(now.timestamp_millis().to_string()),
            Self::Iso => Some(
                now.with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        }
    }
}

/// Renders `template` against `ctx` using the current local time.
pub fn render(template: &str, ctx: &TemplateContext) -> String {
    render_at(template, ctx, Local::now())
}

/// Renders `template` against `ctx` at a fixed point in time.
///
/// Unknown or unresolvable placeholders are kept verbatim.
pub fn render_at(template: &str, ctx: &TemplateContext, now: DateTime<Local>) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let token = &caps[0];
            TemplateField::from_name(&caps[1])
                .and_then(|field| field.resolve(ctx, now))
                .unwrap_or_else(|| token.to_string())
        })
        .into_owned()
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    /// Known fields referenced by the template, in first-use order.
    pub fields: Vec<String>,
}

/// Checks a template for problems without failing.
///
/// # Checks
///
/// 1. Template must not be blank
/// 2. `{{` and `}}` counts must match
/// 3. Field names must match `[A-Za-z][A-Za-z0-9_]*`
/// 4. Field names must be known
///
/// # Examples
///
/// ```ignore
/// let result = validate("{{title}} - {{url}}");
/// assert!(result.valid);
/// assert_eq!(result.fields, vec!["title", "url"]);
/// ```
pub fn validate(template: &str) -> TemplateValidation {
    let mut errors = Vec::new();
    let mut fields: Vec<String> = Vec::new();

    if template.trim().is_empty() {
        errors.push("Template content cannot be empty".to_string());
        return TemplateValidation {
            valid: false,
            errors,
            fields,
        };
    }

    let opens = template.matches("{{").count();
    let closes = template.matches("}}").count();
    if opens != closes {
        errors.push(format!(
            "Unmatched braces: found {opens} '{{{{' and {closes} '}}}}'"
        ));
    }

    for caps in ANY_PLACEHOLDER_REGEX.captures_iter(template) {
        let name = &caps[1];

        if !FIELD_NAME_REGEX.is_match(name) {
            errors.push(format!("Invalid field name: '{name}'"));
            continue;
        }

        if TemplateField::from_name(name).is_none() {
            errors.push(format!("Unknown field: '{name}'"));
            continue;
        }

        if !fields.iter().any(|f| f == name) {
            fields.push(name.to_string());
        }
    }

    TemplateValidation {
        valid: errors.is_empty(),
        errors,
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ctx(url: &str) -> TemplateContext {
        TemplateContext {
            url: url.to_string(),
            title: "Example Page".to_string(),
            url_cleaning: CleaningMode::Smart,
            short_url: None,
        }
    }

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    #[test]
    fn test_render_url_is_cleaned() {
        let out = render("{{url}}", &ctx("https://a.com/?utm_source=x"));
        assert_eq!(out, "https://a.com/");
    }

    #[test]
    fn test_render_keeps_original_url() {
        let out = render(
            "{{originalUrl}}",
            &ctx("https://a.com/page?utm_source=x&id=1"),
        );
        assert_eq!(out, "https://a.com/page?utm_source=x&id=1");
    }

    #[test]
    fn test_render_unknown_field_untouched() {
        let out = render("{{unknownField}}", &TemplateContext::default());
        assert_eq!(out, "{{unknownField}}");
    }

    #[test]
    fn test_render_mixed_template() {
        let out = render(
            "[{{title}}]({{url}}) on {{domain}} / {{hostname}}",
            &ctx("https://www.example.com/page?fbclid=1&id=2"),
        );
        assert_eq!(
            out,
            "[Example Page](https://www.example.com/page?id=2) on example.com / www.example.com"
        );
    }

    #[test]
    fn test_render_unresolvable_field_left_in_place() {
        let out = render("{{hostname}}|{{title}}", &ctx("not a url"));
        assert_eq!(out, "{{hostname}}|Example Page");
    }

    #[test]
    fn test_render_short_url_fallback() {
        let mut context = ctx("https://example.com/a?utm_medium=m");
        assert_eq!(render("{{shortUrl}}", &context), "https://example.com/a");

        context.short_url = Some("https://is.gd/abc".to_string());
        assert_eq!(render("{{shortUrl}}", &context), "https://is.gd/abc");
    }

    #[test]
    fn test_render_time_fields() {
        let now = fixed_now();
        let context = ctx("https://example.com");

        assert_eq!(render_at("{{date}}", &context, now), "2024-03-05");
        assert_eq!(render_at("{{time}}", &context, now), "14:07:09");
        assert_eq!(
            render_at("{{datetime}}", &context, now),
            "2024-03-05 14:07:09"
        );
        assert_eq!(
            render_at("{{timestamp}}", &context, now),
            now.timestamp_millis().to_string()
        );

        let iso = render_at("{{iso}}", &context, now);
        assert!(iso.ends_with(".000Z"), "{iso}");
        assert_eq!(iso.len(), "2024-03-05T14:07:09.000Z".len());
    }

    #[test]
    fn test_render_repeated_fields() {
        let out = render("{{title}} {{title}}", &ctx("https://example.com"));
        assert_eq!(out, "Example Page Example Page");
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in TemplateField::ALL {
            assert_eq!(TemplateField::from_name(field.name()), Some(field));
        }
        assert_eq!(TemplateField::from_name("URL"), None);
    }

    #[test]
    fn test_validate_valid_template() {
        let result = validate("{{title}} - {{url}}");
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.fields, vec!["title", "url"]);
    }

    #[test]
    fn test_validate_dedups_fields() {
        let result = validate("{{url}} {{title}} {{url}}");
        assert_eq!(result.fields, vec!["url", "title"]);
    }

    #[test]
    fn test_validate_invalid_field_name() {
        let result = validate("{{bad name}}");
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.contains("bad name")));
    }

    #[test]
    fn test_validate_rejects_padded_field_name() {
        let result = validate("{{ title }}");
        assert!(!result.valid);
        assert!(result.fields.is_empty());
        assert!(result.errors.iter().any(|e| e.contains("' title '")));

        assert_eq!(render("{{ title }}", &ctx("https://a.com/")), "{{ title }}");
    }

    #[test]
    fn test_validate_unknown_field() {
        let result = validate("{{url}} {{author}}");
        assert!(!result.valid);
        assert_eq!(result.fields, vec!["url"]);
        assert!(result.errors.iter().any(|e| e.contains("author")));
    }

    #[test]
    fn test_validate_empty_template() {
        for input in ["", "   \n"] {
            let result = validate(input);
            assert!(!result.valid);
            assert_eq!(result.errors.len(), 1);
        }
    }

    #[test]
    fn test_validate_unmatched_braces() {
        let result = validate("{{title}} {{url");
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.contains("Unmatched")));
        assert_eq!(result.fields, vec!["title"]);
    }

    #[test]
    fn test_validate_plain_text_is_valid() {
        let result = validate("no placeholders here");
        assert!(result.valid);
        assert!(result.fields.is_empty());
    }
}
