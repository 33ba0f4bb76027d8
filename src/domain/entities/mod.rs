//! Core domain entities representing the copier's data model.
//!
//! Entities are plain data structures without I/O. Persisted ones use
//! camelCase field names so documents stay compatible across every context
//! that reads the same store.
//!
//! # Entity Types
//!
//! - [`CleaningMode`] / [`ShortUrlProvider`] - Copy behaviour selectors
//! - [`Template`] - A `{{field}}` copy template (presets and custom)
//! - [`Settings`] - Persisted user preferences
//! - [`TabInfo`] - A tab's URL and title as supplied by callers
//! - [`CacheEntry`] - A cached short URL

pub mod cache_entry;
pub mod cleaning;
pub mod settings;
pub mod tab;
pub mod template;

pub use cache_entry::{CacheEntry, cache_key};
pub use cleaning::{CleaningMode, ParseKindError, ShortUrlProvider};
pub use settings::{CopyFormat, Settings, SettingsPatch};
pub use tab::TabInfo;
pub use template::{
    DEFAULT_TEMPLATE_ICON, NewTemplate, Template, TemplatePatch, preset_templates,
};
