//! Closed enum catalogs with lenient wire parsing.
//!
//! Catalogs evolve across releases; persisted data may carry values a newer
//! or older binary does not know. Parsing therefore never fails: an
//! unrecognized wire value maps to the `Unknown` sentinel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of pluggable provider a configuration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    Music,
    Player,
    Metadata,
    Plugin,
    Core,
    /// Fallback for wire values not in this catalog.
    #[serde(other)]
    Unknown,
}

impl ProviderType {
    /// Wire representation of this catalog member.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Player => "player",
            Self::Metadata => "metadata",
            Self::Plugin => "plugin",
            Self::Core => "core",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "music" => Self::Music,
            "player" => Self::Player,
            "metadata" => Self::Metadata,
            "plugin" => Self::Plugin,
            "core" => Self::Core,
            _ => Self::Unknown,
        })
    }
}
