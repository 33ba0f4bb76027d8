//! Data Transfer Objects for message requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Field names are camelCase on the wire.

pub mod cache;
pub mod clean;
pub mod copy;
pub mod health;
pub mod short_url;
pub mod templates;
