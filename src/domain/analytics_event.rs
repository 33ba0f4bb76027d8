//! Analytics event model for fire-and-forget usage tracking.

use serde_json::Value;
use std::collections::BTreeMap;

/// An in-memory analytics event awaiting delivery.
///
/// Events are pushed onto a bounded channel by
/// [`crate::application::services::AnalyticsTracker`] and drained by
/// [`crate::domain::analytics_worker::run_analytics_worker`]. Delivery is
/// best effort: events may be dropped when the queue is full or the
/// collector keeps failing.
///
/// Custom field values are coerced to strings (or `None` for JSON null) when
/// they are attached, so the envelope always carries flat string data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsEvent {
    pub name: String,
    pub data: BTreeMap<String, Option<String>>,
}

impl AnalyticsEvent {
    /// Creates an event without custom fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: BTreeMap::new(),
        }
    }

    /// Attaches a custom field, coercing the value to a string.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = AnalyticsEvent::new("copy")
    ///     .with_field("format", "markdown")
    ///     .with_field("count", 3)
    ///     .with_field("template", serde_json::Value::Null);
    /// assert_eq!(event.data["count"], Some("3".to_string()));
    /// assert_eq!(event.data["template"], None);
    /// ```
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), coerce_value(value.into()));
        self
    }

    /// Builds an event from an arbitrary JSON object of custom fields.
    ///
    /// Non-object payloads are ignored.
    pub fn from_json(name: impl Into<String>, data: Value) -> Self {
        let mut event = Self::new(name);
        if let Value::Object(map) = data {
            for (key, value) in map {
                event.data.insert(key, coerce_value(value));
            }
        }
        event
    }
}

/// Coerces a JSON value to the flat string form the collector expects.
pub fn coerce_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_creation_minimal() {
        let event = AnalyticsEvent::new("popup_open");
        assert_eq!(event.name, "popup_open");
        assert!(event.data.is_empty());
    }

    #[test]
    fn test_field_coercion() {
        let event = AnalyticsEvent::new("copy")
            .with_field("format", "markdown")
            .with_field("count", 3)
            .with_field("silent", true)
            .with_field("template", Value::Null);

        assert_eq!(event.data["format"], Some("markdown".to_string()));
        assert_eq!(event.data["count"], Some("3".to_string()));
        assert_eq!(event.data["silent"], Some("true".to_string()));
        assert_eq!(event.data["template"], None);
    }

    #[test]
    fn test_from_json_flattens_nested_values() {
        let event = AnalyticsEvent::from_json(
            "batch_copy",
            json!({ "tabs": 12, "meta": { "a": 1 }, "service": "isgd" }),
        );

        assert_eq!(event.data["tabs"], Some("12".to_string()));
        assert_eq!(event.data["meta"], Some("{\"a\":1}".to_string()));
        assert_eq!(event.data["service"], Some("isgd".to_string()));
    }

    #[test]
    fn test_from_json_ignores_non_objects() {
        let event = AnalyticsEvent::from_json("x", json!([1, 2, 3]));
        assert!(event.data.is_empty());
    }
}
