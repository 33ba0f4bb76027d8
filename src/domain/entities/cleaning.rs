//! URL cleaning modes and short-URL provider selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a mode or provider name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseKindError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// How aggressively query parameters are stripped before a URL is copied.
///
/// - `Off` leaves the URL untouched
/// - `Smart` drops known tracking parameters and keeps everything else
/// - `Aggressive` drops the whole query string and fragment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleaningMode {
    Off,
    #[default]
    Smart,
    Aggressive,
}

impl CleaningMode {
    pub const ALL: [CleaningMode; 3] = [Self::Off, Self::Smart, Self::Aggressive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Smart => "smart",
            Self::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for CleaningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CleaningMode {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "smart" => Ok(Self::Smart),
            "aggressive" => Ok(Self::Aggressive),
            _ => Err(ParseKindError {
                kind: "cleaning mode",
                value: s.to_string(),
                expected: "off, smart, aggressive",
            }),
        }
    }
}

/// Third-party short-URL service used to shorten links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortUrlProvider {
    #[default]
    Isgd,
    Vgd,
    Tinyurl,
}

impl ShortUrlProvider {
    pub const ALL: [ShortUrlProvider; 3] = [Self::Isgd, Self::Vgd, Self::Tinyurl];

    /// Stable identifier, also used as the cache key prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Isgd => "isgd",
            Self::Vgd => "vgd",
            Self::Tinyurl => "tinyurl",
        }
    }

    /// Public creation endpoint; the long URL is appended as a query value.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Isgd => "https://is.gd/create.php?format=simple&url=",
            Self::Vgd => "https://v.gd/create.php?format=simple&url=",
            Self::Tinyurl => "https://tinyurl.com/api-create.php?url=",
        }
    }
}

impl fmt::Display for ShortUrlProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShortUrlProvider {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isgd" | "is.gd" => Ok(Self::Isgd),
            "vgd" | "v.gd" => Ok(Self::Vgd),
            "tinyurl" => Ok(Self::Tinyurl),
            _ => Err(ParseKindError {
                kind: "short URL service",
                value: s.to_string(),
                expected: "isgd, vgd, tinyurl",
            }),
        }
    }
}
