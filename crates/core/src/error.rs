//! Mapping error model.

use thiserror::Error;

/// Result type used across the mapping layer.
pub type MappingResult<T> = Result<T, MappingError>;

/// Mapping-level error.
///
/// Keep this focused on deterministic encode/decode failures. Transport and
/// configuration concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// A wire map carried both the prefixed and unprefixed form of one
    /// logical key, so the decode result would depend on insertion order.
    #[error("conflicting wire keys for `{0}`")]
    ConflictingKeys(String),

    /// A wire value had a different shape than the field requires.
    #[error("type mismatch for `{key}`: expected {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// A nested structure could not be encoded/decoded deterministically.
    #[error("malformed wire structure: {0}")]
    MalformedStructure(String),
}

impl MappingError {
    pub fn conflicting_keys(key: impl Into<String>) -> Self {
        Self::ConflictingKeys(key.into())
    }

    pub fn type_mismatch(key: impl Into<String>, expected: &'static str) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected,
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedStructure(msg.into())
    }
}
