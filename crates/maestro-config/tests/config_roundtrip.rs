//! End-to-end tests for building, persisting, redacting, and updating
//! configuration aggregates.

use maestro_config::{
    Config, ConfigEntry, ConfigEntryType, ConfigValue, Error, NoopCipher, PlayerConfig,
    ProviderConfig, Result, SecretCipher, SECURE_STRING_SUBSTITUTE,
};
use serde_json::{json, Value};
use std::collections::BTreeSet;

/// Deterministic fake cipher whose ciphertext is visibly distinct from
/// the plaintext. Idempotent: exports re-encrypt the stored value, so a
/// stable round trip requires encrypt(ciphertext) == ciphertext.
struct TagCipher;

impl SecretCipher for TagCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        if plaintext.starts_with("enc::") {
            return Ok(plaintext.to_string());
        }
        Ok(format!("enc::{}", plaintext.chars().rev().collect::<String>()))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let reversed = ciphertext
            .strip_prefix("enc::")
            .ok_or_else(|| Error::Secrecy("missing ciphertext tag".to_string()))?;
        Ok(reversed.chars().rev().collect())
    }
}

fn player_schema() -> Vec<ConfigEntry> {
    vec![
        ConfigEntry::new("volume", ConfigEntryType::Integer, "Volume")
            .with_default(50i64)
            .with_range(0, 100),
        ConfigEntry::new("crossfade", ConfigEntryType::Boolean, "Crossfade").with_default(false),
        ConfigEntry::new("eq_bands", ConfigEntryType::Integer, "EQ bands")
            .multi()
            .optional(),
        ConfigEntry::new("divider", ConfigEntryType::Divider, ""),
        ConfigEntry::new("password", ConfigEntryType::SecureString, "Password").optional(),
    ]
}

fn player_raw(values: Value) -> Value {
    json!({
        "provider": "sonos",
        "player_id": "kitchen",
        "values": values
    })
}

// ── Volume entry end to end ────────────────────────────────────────

#[test]
fn volume_scenario() {
    let schema = vec![ConfigEntry::new("volume", ConfigEntryType::Integer, "Volume")
        .with_default(50i64)
        .with_range(0, 100)];
    let mut cfg = PlayerConfig::from_raw(&schema, &player_raw(json!({}))).unwrap();

    // Build applies the default.
    assert_eq!(cfg.get_value("volume", None).unwrap(), ConfigValue::Int(50));

    // Equal to default: omitted from the minimal form.
    let raw = cfg.to_raw(Some(&NoopCipher)).unwrap();
    assert_eq!(raw["values"], json!({}));

    // String-to-int parse on update, precise change-set.
    let changed = cfg
        .update(json!({"volume": "75"}).as_object().unwrap())
        .unwrap();
    assert_eq!(changed, BTreeSet::from(["values/volume".to_string()]));
    assert_eq!(cfg.get_value("volume", None).unwrap(), ConfigValue::Int(75));

    // Divergent value is now persisted.
    let raw = cfg.to_raw(Some(&NoopCipher)).unwrap();
    assert_eq!(raw["values"], json!({"volume": 75}));
}

// ── Round-trip stability ───────────────────────────────────────────

#[test]
fn minimal_form_roundtrip_is_stable() {
    let schema = player_schema();
    let raw = player_raw(json!({
        "volume": 80,
        "crossfade": true,
        "eq_bands": [60, 250, 1000],
        "password": "enc::2retnuh"
    }));

    let first = PlayerConfig::from_raw(&schema, &raw).unwrap();
    let minimal = first.to_raw(Some(&TagCipher)).unwrap();

    let second = PlayerConfig::from_raw(&schema, &minimal).unwrap();
    let minimal_again = second.to_raw(Some(&TagCipher)).unwrap();

    // The secure value is re-encrypted each export; with the
    // deterministic TagCipher the documents match exactly.
    assert_eq!(minimal, minimal_again);
    assert_eq!(minimal["values"]["volume"], json!(80));
    assert_eq!(minimal["values"]["eq_bands"], json!([60, 250, 1000]));
}

#[test]
fn minimal_form_with_noop_cipher_is_stable() {
    let schema = player_schema();
    let raw = player_raw(json!({"volume": 30, "password": "plain"}));

    let first = PlayerConfig::from_raw(&schema, &raw).unwrap();
    let minimal = first.to_raw(Some(&NoopCipher)).unwrap();
    let second = PlayerConfig::from_raw(&schema, &minimal).unwrap();
    assert_eq!(minimal, second.to_raw(Some(&NoopCipher)).unwrap());
}

// ── Secrecy boundary ───────────────────────────────────────────────

#[test]
fn export_encrypts_and_redaction_hides_everything() {
    let schema = player_schema();
    let mut cfg = PlayerConfig::from_raw(&schema, &player_raw(json!({}))).unwrap();
    cfg.update(json!({"password": "hunter2"}).as_object().unwrap())
        .unwrap();

    let raw = cfg.to_raw(Some(&TagCipher)).unwrap();
    let exported = raw["values"]["password"].as_str().unwrap();
    assert!(exported.starts_with("enc::"));
    assert_eq!(TagCipher.decrypt(exported).unwrap(), "hunter2");

    // Redaction shows neither the working value nor any ciphertext.
    let doc = cfg.redacted().unwrap();
    assert_eq!(
        doc["values"]["password"]["value"],
        json!(SECURE_STRING_SUBSTITUTE)
    );
    let rendered = doc.to_string();
    assert!(!rendered.contains("hunter2"));
    assert!(!rendered.contains("enc::"));
}

#[test]
fn export_without_cipher_is_fatal_when_secret_present() {
    let schema = player_schema();
    let mut cfg = PlayerConfig::from_raw(&schema, &player_raw(json!({}))).unwrap();
    cfg.update(json!({"password": "hunter2"}).as_object().unwrap())
        .unwrap();
    assert!(matches!(cfg.to_raw(None), Err(Error::SecrecyNotConfigured)));
}

#[test]
fn export_without_cipher_ok_when_no_secret_diverges() {
    let schema = player_schema();
    let cfg = PlayerConfig::from_raw(&schema, &player_raw(json!({"volume": 10}))).unwrap();
    let raw = cfg.to_raw(None).unwrap();
    assert_eq!(raw["values"], json!({"volume": 10}));
}

// ── Enabled flag change tracking ───────────────────────────────────

#[test]
fn enabled_update_is_tracked_once() {
    let raw = json!({
        "type": "music",
        "domain": "tunein",
        "instance_id": "tunein-1"
    });
    let mut cfg = ProviderConfig::from_raw(&[], &raw).unwrap();
    assert!(cfg.config.enabled);

    let changed = cfg
        .update(json!({"enabled": false}).as_object().unwrap())
        .unwrap();
    assert_eq!(changed, BTreeSet::from(["enabled".to_string()]));

    let changed = cfg
        .update(json!({"enabled": false}).as_object().unwrap())
        .unwrap();
    assert!(changed.is_empty());
}

// ── Raw document shape ─────────────────────────────────────────────

#[test]
fn raw_document_keeps_identity_fields() {
    let schema = player_schema();
    let cfg = PlayerConfig::from_raw(&schema, &player_raw(json!({}))).unwrap();
    let raw = cfg.to_raw(Some(&NoopCipher)).unwrap();
    assert_eq!(raw["provider"], json!("sonos"));
    assert_eq!(raw["player_id"], json!("kitchen"));
    assert_eq!(raw["enabled"], json!(true));
    assert_eq!(raw["available"], json!(true));
}

#[test]
fn redacted_document_exposes_full_schema() {
    let schema = player_schema();
    let cfg = PlayerConfig::from_raw(&schema, &player_raw(json!({}))).unwrap();
    let doc = cfg.redacted().unwrap();
    let values = doc["values"].as_object().unwrap();
    // All entries present for schema introspection, UI-only included.
    assert_eq!(values.len(), schema.len());
    assert!(values.contains_key("divider"));
    assert_eq!(values["volume"]["type"], json!("integer"));
    assert_eq!(values["volume"]["default_value"], json!(50));
    assert_eq!(values["volume"]["range"], json!([0, 100]));
}

#[test]
fn config_document_roundtrips_through_serde() {
    let schema = player_schema();
    let cfg = PlayerConfig::from_raw(&schema, &player_raw(json!({"volume": 42}))).unwrap();
    let doc = serde_json::to_value(&cfg).unwrap();
    let back: PlayerConfig = serde_json::from_value(doc).unwrap();
    assert_eq!(back.config.values["volume"].value, ConfigValue::Int(42));
    assert_eq!(
        back.config.values.keys().collect::<Vec<_>>(),
        cfg.config.values.keys().collect::<Vec<_>>()
    );
}

// ── Base Config on its own ─────────────────────────────────────────

#[test]
fn default_config_is_enabled_and_empty() {
    let cfg = Config::default();
    assert!(cfg.enabled);
    assert!(cfg.name.is_none());
    assert!(cfg.values.is_empty());
}
