//! Configuration error model.

use std::path::PathBuf;

use thiserror::Error;

use crate::credentials::CredentialStoreError;

/// Result type used across the configuration layer.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;

/// Configuration-level error.
///
/// Only an explicitly specified source can fail hard; the default config
/// file is optional and falls back to defaults.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A caller-specified config file path does not exist.
    #[error("configuration file not found: {0}")]
    MissingFile(PathBuf),

    /// A caller-specified config file exists but cannot be read or parsed.
    #[error("configuration file {path} is invalid: {reason}")]
    InvalidFile { path: PathBuf, reason: String },

    /// The secure credential backend failed while resolving a secret.
    #[error(transparent)]
    CredentialStore(#[from] CredentialStoreError),
}

impl ConfigurationError {
    pub fn invalid_file(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFile {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
