//! Maestro common types, errors, and enum catalogs.
//!
//! This crate provides foundational types shared across maestro modules:
//! - Unified error type for configuration operations
//! - Enum catalogs with lenient wire parsing (unknown values never fail)

pub mod enums;
pub mod error;

pub use enums::ProviderType;
pub use error::{Error, Result};
