//! Typed config values.
//!
//! [`ConfigValue`] is the closed set of value shapes a config entry may
//! hold. It replaces the original loose scalar/list union with a tagged
//! variant the coercion engine can match exhaustively. `Null` models
//! absence; enum catalog members are unwrapped to their primitive wire
//! string at construction time via the `From` impls, so a stored raw form
//! is never enum-typed.

use maestro_common::{ProviderType, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A loosely-ordered untagged union of every representable value shape.
///
/// Untagged variant order matters for deserialization: scalars before
/// lists, and list variants before `Pair` (JSON has no tuple type, so a
/// persisted pair arrives as a two-element list and is repaired by the
/// coercion engine when a pair is expected).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    IntList(Vec<i64>),
    PairList(Vec<(i64, i64)>),
    StrList(Vec<String>),
    Pair((i64, i64)),
}

/// The type family a [`ConfigValue`] belongs to.
///
/// All list shapes collapse into [`ValueFamily::List`]: a `multi_value`
/// entry validates the list-ness of its value, not its element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFamily {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Pair,
    List,
}

impl fmt::Display for ValueFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueFamily::Null => "none",
            ValueFamily::Bool => "bool",
            ValueFamily::Int => "int",
            ValueFamily::Float => "float",
            ValueFamily::Str => "str",
            ValueFamily::Pair => "(int, int)",
            ValueFamily::List => "list",
        };
        write!(f, "{name}")
    }
}

impl ConfigValue {
    /// The family this value belongs to.
    pub fn family(&self) -> ValueFamily {
        match self {
            ConfigValue::Null => ValueFamily::Null,
            ConfigValue::Bool(_) => ValueFamily::Bool,
            ConfigValue::Int(_) => ValueFamily::Int,
            ConfigValue::Float(_) => ValueFamily::Float,
            ConfigValue::Str(_) => ValueFamily::Str,
            ConfigValue::Pair(_) => ValueFamily::Pair,
            ConfigValue::IntList(_) | ConfigValue::PairList(_) | ConfigValue::StrList(_) => {
                ValueFamily::List
            }
        }
    }

    /// True when this value models absence.
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Convert a raw JSON value into a typed config value.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// The string content, if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl Default for ConfigValue {
    fn default() -> Self {
        ConfigValue::Null
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        ConfigValue::Int(v)
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        ConfigValue::Float(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::Str(v.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::Str(v)
    }
}

impl From<(i64, i64)> for ConfigValue {
    fn from(v: (i64, i64)) -> Self {
        ConfigValue::Pair(v)
    }
}

impl From<Vec<i64>> for ConfigValue {
    fn from(v: Vec<i64>) -> Self {
        ConfigValue::IntList(v)
    }
}

impl From<Vec<(i64, i64)>> for ConfigValue {
    fn from(v: Vec<(i64, i64)>) -> Self {
        ConfigValue::PairList(v)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(v: Vec<String>) -> Self {
        ConfigValue::StrList(v)
    }
}

impl From<ProviderType> for ConfigValue {
    fn from(v: ProviderType) -> Self {
        ConfigValue::Str(v.as_str().to_string())
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => ConfigValue::Null,
        }
    }
}
