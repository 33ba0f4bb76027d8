//! Identifier generation for user-created templates.

use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;

/// Prefix shared by every custom template id.
pub const CUSTOM_TEMPLATE_PREFIX: &str = "custom_";

/// Number of random characters appended to the timestamp.
const SUFFIX_LENGTH: usize = 6;

/// Generates a new custom template id.
///
/// Format: `custom_<unix millis>_<6 alphanumeric chars>`. Ids are unique
/// for practical purposes but not cryptographically unpredictable.
///
/// # Examples
///
/// ```ignore
/// let id = generate_template_id();
/// assert!(id.starts_with("custom_"));
/// ```
pub fn generate_template_id() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LENGTH)
        .map(char::from)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    format!(
        "{CUSTOM_TEMPLATE_PREFIX}{}_{suffix}",
        Utc::now().timestamp_millis()
    )
}

/// Returns `true` for ids produced by [`generate_template_id`].
pub fn is_custom_template_id(id: &str) -> bool {
    id.starts_with(CUSTOM_TEMPLATE_PREFIX)
}
