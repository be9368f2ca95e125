//! Error types for Maestro configuration handling.

use thiserror::Error;

/// Result type alias for Maestro configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Maestro configuration handling.
#[derive(Error, Debug)]
pub enum Error {
    // Coercion errors (10-19)
    #[error("config entry '{key}' has unexpected type: expected {expected}, got {actual}")]
    SchemaMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("config entry '{key}' is required but holds no value")]
    MissingRequiredValue { key: String },

    // Secrecy errors (20-29)
    #[error("no secret cipher installed while touching a secure_string value")]
    SecrecyNotConfigured,

    #[error("secret cipher failed: {0}")]
    Secrecy(String),

    // Lookup errors (30-39)
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    // Serialization errors (60-69)
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for machine-readable error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::SchemaMismatch { .. } => 10,
            Error::MissingRequiredValue { .. } => 11,
            Error::SecrecyNotConfigured => 20,
            Error::Secrecy(_) => 21,
            Error::UnknownKey(_) => 30,
            Error::Json(_) => 61,
        }
    }
}
