//! Pluggable secrecy strategy for secure-string values.
//!
//! The aggregate never treats a secure string as plaintext by default: a
//! cipher must be supplied at every read/export touch point, and its
//! absence is a hard error at the call site rather than a silent no-op.
//! Strategies are injected per call so the aggregates stay plain data;
//! there is no process-wide mutable cipher registry.

use maestro_common::Result;

/// Opaque placeholder emitted in display projections instead of secret
/// content. Consumers can detect "a secret is set" but never its value
/// or ciphertext.
pub const SECURE_STRING_SUBSTITUTE: &str = "this_value_is_encrypted";

/// Symmetric transform applied to secure-string values.
///
/// `encrypt` runs on every export, so implementations need not be
/// idempotent; `decrypt` must invert whatever the paired `encrypt`
/// produced. Both are expected to be cheap and synchronous.
pub trait SecretCipher: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> Result<String>;
    fn decrypt(&self, ciphertext: &str) -> Result<String>;
}

/// Identity cipher for tests and development hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCipher;

impl SecretCipher for NoopCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        Ok(plaintext.to_string())
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String> {
        Ok(ciphertext.to_string())
    }
}
