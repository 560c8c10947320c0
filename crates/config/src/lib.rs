//! `clearbooks-config` — operational configuration and credential access.
//!
//! Resolves endpoint, API key and logging settings with a fixed precedence:
//! explicit assignment > environment > config file > built-in default. API
//! keys should come from a [`CredentialStore`] rather than plain
//! configuration; a stored secret always wins over a plain-config value.

pub mod configuration;
pub mod credentials;
pub mod error;

pub use configuration::{Configuration, DEFAULT_CONFIG_PATH, DEFAULT_ENDPOINT};
pub use credentials::{
    CredentialStore, CredentialStoreError, DirCredentialStore, EnvCredentialStore,
    MemoryCredentialStore,
};
pub use error::{ConfigurationError, ConfigurationResult};
