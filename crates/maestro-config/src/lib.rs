//! Maestro configuration model.
//!
//! This crate provides:
//! - Typed config values and the closed catalog of entry kinds
//! - Declarative entry schemas ([`ConfigEntry`]) with defaults, options,
//!   ranges, and dependency linkage
//! - The coercion engine that reconciles loosely-typed persisted values
//!   with their declared kinds
//! - Configuration aggregates for providers, players, and core modules,
//!   with minimal persistence, redacted display projection, and change
//!   tracking on partial updates
//! - The pluggable secrecy strategy guarding secure-string values

pub mod config;
pub mod entry;
pub mod secrecy;
pub mod value;

pub use config::{Config, CoreConfig, PlayerConfig, ProviderConfig};
pub use entry::{ConfigEntry, ConfigEntryType, ConfigValueOption};
pub use secrecy::{NoopCipher, SecretCipher, SECURE_STRING_SUBSTITUTE};
pub use value::{ConfigValue, ValueFamily};

pub use maestro_common::{Error, Result};

/// Schema version for persisted configuration documents.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
