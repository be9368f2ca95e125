//! Config entry schemas and the coercion engine.
//!
//! A [`ConfigEntry`] is the declarative description of one configurable
//! setting: its kind, default, required-ness, choices, and UI metadata.
//! [`ConfigEntry::parse_value`] is the coercion engine that reconciles a
//! loosely-typed raw value (as read from storage or an update request)
//! with the declared kind, applying a fixed recovery chain before giving
//! up with a schema mismatch.

use crate::value::{ConfigValue, ValueFamily};
use maestro_common::{Error, Result};
use serde::{Deserialize, Serialize};

/// Closed catalog of the value kinds a config entry may hold.
///
/// `Label`, `Divider`, `Action`, and `Alert` are UI-only: they carry no
/// meaningfully validated data. `Unknown` is the lenient fallback for
/// wire values written by a newer schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigEntryType {
    Boolean,
    String,
    SecureString,
    Integer,
    Float,
    IntegerTuple,
    Label,
    Divider,
    Action,
    Icon,
    Alert,
    #[serde(other)]
    Unknown,
}

impl ConfigEntryType {
    /// True for kinds that carry no persisted/validated data.
    pub fn is_ui_only(&self) -> bool {
        matches!(
            self,
            Self::Label | Self::Divider | Self::Action | Self::Alert
        )
    }

    /// The scalar family a value of this kind must belong to.
    ///
    /// `Unknown` maps to the none family: only absence is acceptable.
    pub fn expected_family(&self) -> ValueFamily {
        match self {
            Self::Boolean => ValueFamily::Bool,
            Self::Integer => ValueFamily::Int,
            Self::Float => ValueFamily::Float,
            Self::IntegerTuple => ValueFamily::Pair,
            Self::String
            | Self::SecureString
            | Self::Label
            | Self::Divider
            | Self::Action
            | Self::Icon
            | Self::Alert => ValueFamily::Str,
            Self::Unknown => ValueFamily::Null,
        }
    }
}

/// An enumerated choice for an entry, with a display title separate from
/// the stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigValueOption {
    pub title: String,
    pub value: ConfigValue,
}

impl ConfigValueOption {
    pub fn new(title: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_category() -> String {
    "generic".to_string()
}

/// Schema definition of one configurable setting, plus its live value.
///
/// The definition half is immutable in spirit: aggregates copy it before
/// assigning a value, and `value` is only ever written through
/// [`ConfigEntry::parse_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Identifier for the entry, unique within a schema; also the
    /// localization key.
    pub key: String,

    #[serde(rename = "type")]
    pub entry_type: ConfigEntryType,

    /// Fallback caption when no translation for the key is present.
    pub label: String,

    #[serde(default)]
    pub default_value: ConfigValue,

    #[serde(default = "default_true")]
    pub required: bool,

    /// Enumerated choices to pick from.
    #[serde(default)]
    pub options: Option<Vec<ConfigValueOption>>,

    /// Inclusive numeric bound; advisory to consumers, not enforced here.
    #[serde(default)]
    pub range: Option<(i64, i64)>,

    /// Extended description of the setting.
    #[serde(default)]
    pub description: Option<String>,

    /// Link to a help article.
    #[serde(default)]
    pub help_link: Option<String>,

    /// When true the value is a list of the declared kind.
    #[serde(default)]
    pub multi_value: bool,

    /// Key of another entry that must be set before this one is shown.
    #[serde(default)]
    pub depends_on: Option<String>,

    /// Complementary to `depends_on`: only enable for this value.
    #[serde(default)]
    pub depends_on_value: Option<ConfigValue>,

    /// Hide from the UI.
    #[serde(default)]
    pub hidden: bool,

    /// Frontend grouping category (e.g. "advanced").
    #[serde(default = "default_category")]
    pub category: String,

    /// Action needed to obtain the value for this entry.
    #[serde(default)]
    pub action: Option<String>,

    /// Fallback caption for the action.
    #[serde(default)]
    pub action_label: Option<String>,

    /// Current value, set by the config manager through `parse_value`.
    #[serde(default)]
    pub value: ConfigValue,
}

impl ConfigEntry {
    /// Minimal constructor; remaining fields take their schema defaults.
    pub fn new(
        key: impl Into<String>,
        entry_type: ConfigEntryType,
        label: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            entry_type,
            label: label.into(),
            default_value: ConfigValue::Null,
            required: true,
            options: None,
            range: None,
            description: None,
            help_link: None,
            multi_value: false,
            depends_on: None,
            depends_on_value: None,
            hidden: false,
            category: default_category(),
            action: None,
            action_label: None,
            value: ConfigValue::Null,
        }
    }

    pub fn with_default(mut self, default_value: impl Into<ConfigValue>) -> Self {
        self.default_value = default_value.into();
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_range(mut self, low: i64, high: i64) -> Self {
        self.range = Some((low, high));
        self
    }

    pub fn with_options(mut self, options: Vec<ConfigValueOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn multi(mut self) -> Self {
        self.multi_value = true;
        self
    }

    /// Coerce `value` against this entry's declared kind and write the
    /// result into `self.value`.
    ///
    /// Absent values fall back to the default; a still-absent value is
    /// acceptable when the entry is not required or `allow_missing` is
    /// set. Mismatched families go through a fixed recovery chain
    /// (numeric widening/truncation, string-to-number parsing, fallback
    /// to default) before failing.
    pub fn parse_value(&mut self, value: ConfigValue, allow_missing: bool) -> Result<ConfigValue> {
        let mut expected = if self.multi_value {
            ValueFamily::List
        } else {
            self.entry_type.expected_family()
        };

        // Labels are display-only: the value is always the caption, no
        // matter what the raw input holds.
        if self.entry_type == ConfigEntryType::Label {
            let caption = ConfigValue::Str(self.label.clone());
            self.value = caption.clone();
            return Ok(caption);
        }

        let mut value = value;
        if value.is_null() {
            value = self.default_value.clone();
        }
        if value.is_null() && (!self.required || allow_missing) {
            expected = ValueFamily::Null;
        }

        if value.family() != expected {
            value = self.recover(value, expected, allow_missing)?;
        }

        self.value = value.clone();
        Ok(value)
    }

    /// Recovery chain for a value whose family does not match; first
    /// match wins.
    fn recover(
        &self,
        value: ConfigValue,
        expected: ValueFamily,
        allow_missing: bool,
    ) -> Result<ConfigValue> {
        // JSON has no tuple type, so persisted pairs arrive as plain
        // two-element lists.
        if expected == ValueFamily::Pair {
            if let ConfigValue::IntList(items) = &value {
                if let [a, b] = items[..] {
                    return Ok(ConfigValue::Pair((a, b)));
                }
            }
        }
        if expected == ValueFamily::Float {
            if let ConfigValue::Int(i) = value {
                return Ok(ConfigValue::Float(i as f64));
            }
        }
        if expected == ValueFamily::Int {
            if let ConfigValue::Float(f) = value {
                // `as` truncates toward zero
                return Ok(ConfigValue::Int(f as i64));
            }
        }
        if let ConfigValue::Str(s) = &value {
            // Numeric parse from string; parse failures fall through
            // silently to the remaining recovery steps.
            match expected {
                ValueFamily::Int => {
                    if let Ok(i) = s.parse::<i64>() {
                        return Ok(ConfigValue::Int(i));
                    }
                }
                ValueFamily::Float => {
                    if let Ok(f) = s.parse::<f64>() {
                        return Ok(ConfigValue::Float(f));
                    }
                }
                _ => {}
            }
        }
        if self.entry_type.is_ui_only() {
            return Ok(self.default_value.clone());
        }
        let mut value = value;
        if !self.default_value.is_null() {
            tracing::warn!(
                key = %self.key,
                actual = %value.family(),
                "config value has unexpected type, falling back to default"
            );
            value = self.default_value.clone();
            if value.family() == expected {
                return Ok(value);
            }
            // A default of the wrong family is a schema-authoring error;
            // fall through to the failure below instead of propagating a
            // wrong-typed value.
        }
        if value.is_null() && (!self.required || allow_missing) {
            return Ok(ConfigValue::Null);
        }
        if value.is_null() {
            return Err(Error::MissingRequiredValue {
                key: self.key.clone(),
            });
        }
        Err(Error::SchemaMismatch {
            key: self.key.clone(),
            expected: expected.to_string(),
            actual: value.family().to_string(),
        })
    }
}
