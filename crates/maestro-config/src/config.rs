//! Configuration aggregates for providers, players, and core modules.
//!
//! An aggregate is an ordered key→entry mapping plus a few root fields.
//! It is built once from a schema and a raw persisted document, mutated
//! only through [`Config::update`], exported as a minimal document
//! (values diverging from defaults only), and projected to a redacted
//! document for untrusted consumers.

use crate::entry::{ConfigEntry, ConfigEntryType};
use crate::secrecy::{SecretCipher, SECURE_STRING_SUBSTITUTE};
use crate::value::ConfigValue;
use indexmap::IndexMap;
use maestro_common::{Error, ProviderType, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};
use std::collections::BTreeSet;

fn default_true() -> bool {
    true
}

/// Shared root fields and entry mapping embedded by every concrete
/// configuration kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Whether the configured subsystem is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Optional custom name for this instance.
    #[serde(default)]
    pub name: Option<String>,

    /// Live entries, in schema order.
    #[serde(default)]
    pub values: IndexMap<String, ConfigEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            name: None,
            values: IndexMap::new(),
        }
    }
}

impl Config {
    /// Populate the entry mapping from schema definitions and a raw
    /// values bag, in schema order. Raw keys without a definition are
    /// ignored.
    fn populate(
        &mut self,
        entries: &[ConfigEntry],
        raw_values: Option<&JsonMap<String, Value>>,
    ) -> Result<()> {
        for entry in entries {
            let mut entry = entry.clone();
            let raw = match raw_values.and_then(|m| m.get(&entry.key)) {
                Some(json) => ConfigValue::from_json(json)?,
                None => ConfigValue::Null,
            };
            entry.parse_value(raw, true)?;
            self.values.insert(entry.key.clone(), entry);
        }
        Ok(())
    }

    /// Current value for `key`; secure strings are decrypted through the
    /// installed cipher.
    pub fn get_value(&self, key: &str, secrets: Option<&dyn SecretCipher>) -> Result<ConfigValue> {
        let entry = self
            .values
            .get(key)
            .ok_or_else(|| Error::UnknownKey(key.to_string()))?;
        if entry.entry_type == ConfigEntryType::SecureString {
            if let Some(ciphertext) = entry.value.as_str() {
                if !ciphertext.is_empty() {
                    let cipher = secrets.ok_or(Error::SecrecyNotConfigured)?;
                    return Ok(ConfigValue::Str(cipher.decrypt(ciphertext)?));
                }
            }
        }
        Ok(entry.value.clone())
    }

    /// Minimal raw values bag: entries diverging from their default,
    /// UI-only kinds excluded, secure strings encrypted.
    fn minimal_values(&self, secrets: Option<&dyn SecretCipher>) -> Result<JsonMap<String, Value>> {
        let mut out = JsonMap::new();
        for (key, entry) in &self.values {
            if entry.entry_type.is_ui_only() || entry.value == entry.default_value {
                continue;
            }
            let value = match (&entry.entry_type, entry.value.as_str()) {
                (ConfigEntryType::SecureString, Some(plaintext)) => {
                    let cipher = secrets.ok_or(Error::SecrecyNotConfigured)?;
                    ConfigValue::Str(cipher.encrypt(plaintext)?)
                }
                _ => entry.value.clone(),
            };
            out.insert(key.clone(), serde_json::to_value(&value)?);
        }
        Ok(out)
    }

    /// Replace every non-empty secure-string `value` in a serialized
    /// document with the opaque placeholder.
    fn redact_in(&self, doc: &mut Value) {
        let Some(values) = doc.get_mut("values").and_then(Value::as_object_mut) else {
            return;
        };
        for (key, entry) in &self.values {
            if entry.entry_type != ConfigEntryType::SecureString {
                continue;
            }
            let secret_set = entry.value.as_str().is_some_and(|s| !s.is_empty());
            if !secret_set {
                continue;
            }
            if let Some(obj) = values.get_mut(key).and_then(Value::as_object_mut) {
                obj.insert(
                    "value".to_string(),
                    Value::String(SECURE_STRING_SUBSTITUTE.to_string()),
                );
            }
        }
    }

    /// Apply a partial update and return the set of changed identifiers:
    /// bare root field names, and `values/<key>` for entries. Unknown
    /// keys are silently ignored.
    pub fn update(&mut self, changes: &JsonMap<String, Value>) -> Result<BTreeSet<String>> {
        let mut changed = BTreeSet::new();

        if let Some(Value::Bool(enabled)) = changes.get("enabled") {
            if *enabled != self.enabled {
                self.enabled = *enabled;
                changed.insert("enabled".to_string());
            }
        }
        if let Some(value) = changes.get("name") {
            let name = match value {
                Value::Null => Some(None),
                Value::String(s) => Some(Some(s.clone())),
                _ => None,
            };
            if let Some(name) = name {
                if name != self.name {
                    self.name = name;
                    changed.insert("name".to_string());
                }
            }
        }

        for (key, raw) in changes {
            if key == "enabled" || key == "name" {
                continue;
            }
            let Some(entry) = self.values.get_mut(key) else {
                continue;
            };
            let previous = entry.value.clone();
            let parsed = entry.parse_value(ConfigValue::from_json(raw)?, true)?;
            if parsed != previous {
                changed.insert(format!("values/{key}"));
            }
        }

        Ok(changed)
    }

    /// Re-coerce every entry against its own value with strict missing
    /// semantics, surfacing required entries that hold no value.
    pub fn validate(&mut self) -> Result<()> {
        for entry in self.values.values_mut() {
            let current = entry.value.clone();
            entry.parse_value(current, false)?;
        }
        Ok(())
    }
}

/// Strip the raw `values` bag out of a persisted document and
/// deserialize the remaining root fields.
fn from_raw_parts<T: DeserializeOwned>(raw: &Value) -> Result<(T, Option<JsonMap<String, Value>>)> {
    let mut root = raw.clone();
    let raw_values = match root.as_object_mut().and_then(|m| m.remove("values")) {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    };
    Ok((serde_json::from_value(root)?, raw_values))
}

/// Serialize a full document and swap in a minimal values bag.
fn with_values(doc: Value, values: JsonMap<String, Value>) -> Value {
    let mut doc = doc;
    if let Some(obj) = doc.as_object_mut() {
        obj.insert("values".to_string(), Value::Object(values));
    }
    doc
}

/// Provider (instance) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(rename = "type")]
    pub provider_type: ProviderType,

    /// Domain of the provider this config belongs to.
    pub domain: String,

    /// Unique id of this provider instance.
    pub instance_id: String,

    /// Error message if the provider could not be set up with this config.
    #[serde(default)]
    pub last_error: Option<String>,

    #[serde(flatten)]
    pub config: Config,
}

impl ProviderConfig {
    /// Build from schema definitions and a raw persisted document.
    pub fn from_raw(entries: &[ConfigEntry], raw: &Value) -> Result<Self> {
        let (mut cfg, raw_values) = from_raw_parts::<Self>(raw)?;
        cfg.config.values.clear();
        cfg.config.populate(entries, raw_values.as_ref())?;
        Ok(cfg)
    }

    /// Minimal document for persistent storage.
    pub fn to_raw(&self, secrets: Option<&dyn SecretCipher>) -> Result<Value> {
        let minimal = self.config.minimal_values(secrets)?;
        Ok(with_values(serde_json::to_value(self)?, minimal))
    }

    /// Full document for display/API consumers, secrets replaced by the
    /// placeholder.
    pub fn redacted(&self) -> Result<Value> {
        let mut doc = serde_json::to_value(self)?;
        self.config.redact_in(&mut doc);
        Ok(doc)
    }

    pub fn get_value(&self, key: &str, secrets: Option<&dyn SecretCipher>) -> Result<ConfigValue> {
        self.config.get_value(key, secrets)
    }

    pub fn update(&mut self, changes: &JsonMap<String, Value>) -> Result<BTreeSet<String>> {
        self.config.update(changes)
    }

    pub fn validate(&mut self) -> Result<()> {
        self.config.validate()
    }
}

/// Player configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Domain of the provider that exposes this player.
    pub provider: String,

    /// Unique id of the player.
    pub player_id: String,

    /// Whether the player is currently available.
    #[serde(default = "default_true")]
    pub available: bool,

    /// Name to fall back to when no custom name is set.
    #[serde(default)]
    pub default_name: Option<String>,

    #[serde(flatten)]
    pub config: Config,
}

impl PlayerConfig {
    pub fn from_raw(entries: &[ConfigEntry], raw: &Value) -> Result<Self> {
        let (mut cfg, raw_values) = from_raw_parts::<Self>(raw)?;
        cfg.config.values.clear();
        cfg.config.populate(entries, raw_values.as_ref())?;
        Ok(cfg)
    }

    pub fn to_raw(&self, secrets: Option<&dyn SecretCipher>) -> Result<Value> {
        let minimal = self.config.minimal_values(secrets)?;
        Ok(with_values(serde_json::to_value(self)?, minimal))
    }

    pub fn redacted(&self) -> Result<Value> {
        let mut doc = serde_json::to_value(self)?;
        self.config.redact_in(&mut doc);
        Ok(doc)
    }

    pub fn get_value(&self, key: &str, secrets: Option<&dyn SecretCipher>) -> Result<ConfigValue> {
        self.config.get_value(key, secrets)
    }

    pub fn update(&mut self, changes: &JsonMap<String, Value>) -> Result<BTreeSet<String>> {
        self.config.update(changes)
    }

    pub fn validate(&mut self) -> Result<()> {
        self.config.validate()
    }
}

/// Core module configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Domain/name of the core module.
    pub domain: String,

    /// Error message if the module could not be set up with this config.
    #[serde(default)]
    pub last_error: Option<String>,

    #[serde(flatten)]
    pub config: Config,
}

impl CoreConfig {
    pub fn from_raw(entries: &[ConfigEntry], raw: &Value) -> Result<Self> {
        let (mut cfg, raw_values) = from_raw_parts::<Self>(raw)?;
        cfg.config.values.clear();
        cfg.config.populate(entries, raw_values.as_ref())?;
        Ok(cfg)
    }

    pub fn to_raw(&self, secrets: Option<&dyn SecretCipher>) -> Result<Value> {
        let minimal = self.config.minimal_values(secrets)?;
        Ok(with_values(serde_json::to_value(self)?, minimal))
    }

    pub fn redacted(&self) -> Result<Value> {
        let mut doc = serde_json::to_value(self)?;
        self.config.redact_in(&mut doc);
        Ok(doc)
    }

    pub fn get_value(&self, key: &str, secrets: Option<&dyn SecretCipher>) -> Result<ConfigValue> {
        self.config.get_value(key, secrets)
    }

    pub fn update(&mut self, changes: &JsonMap<String, Value>) -> Result<BTreeSet<String>> {
        self.config.update(changes)
    }

    pub fn validate(&mut self) -> Result<()> {
        self.config.validate()
    }
}
