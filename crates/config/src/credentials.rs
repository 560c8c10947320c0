//! Secure credential access.
//!
//! API keys belong in a secret backend, not in plain configuration. The
//! store contract distinguishes "secret not present" (a normal `Ok(None)`)
//! from "backend unreachable" (an error).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Credential backend failure. An absent secret is not an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialStoreError {
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

impl CredentialStoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Lookup contract for named secrets.
pub trait CredentialStore: Send + Sync {
    /// Fetch a secret. `Ok(None)` means the backend is healthy but holds no
    /// entry under this name.
    fn read(&self, name: &str) -> Result<Option<String>, CredentialStoreError>;

    /// Store a secret.
    fn write(&self, name: &str, secret: &str) -> Result<(), CredentialStoreError>;
}

/// Environment-variable backend.
///
/// Secret names map to `<PREFIX><NAME-uppercased>`. Read-only: the process
/// environment is not a place this library writes secrets to.
pub struct EnvCredentialStore {
    prefix: String,
}

impl EnvCredentialStore {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn variable_name(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name.to_uppercase())
    }
}

impl Default for EnvCredentialStore {
    fn default() -> Self {
        Self::new("CLEARBOOKS_SECRET_")
    }
}

impl CredentialStore for EnvCredentialStore {
    fn read(&self, name: &str) -> Result<Option<String>, CredentialStoreError> {
        Ok(std::env::var(self.variable_name(name)).ok())
    }

    fn write(&self, _name: &str, _secret: &str) -> Result<(), CredentialStoreError> {
        Err(CredentialStoreError::unavailable(
            "environment credential store is read-only",
        ))
    }
}

/// Directory backend: one file per secret, trimmed on read.
///
/// Matches mounted-secret layouts (Docker/Kubernetes style).
pub struct DirCredentialStore {
    base: PathBuf,
}

impl DirCredentialStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl CredentialStore for DirCredentialStore {
    fn read(&self, name: &str) -> Result<Option<String>, CredentialStoreError> {
        if !self.base.is_dir() {
            return Err(CredentialStoreError::unavailable(format!(
                "secret directory {} does not exist",
                self.base.display()
            )));
        }
        let path = self.base.join(name);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(|content| Some(content.trim().to_string()))
            .map_err(|e| {
                CredentialStoreError::unavailable(format!("{}: {e}", path.display()))
            })
    }

    fn write(&self, name: &str, secret: &str) -> Result<(), CredentialStoreError> {
        if !self.base.is_dir() {
            return Err(CredentialStoreError::unavailable(format!(
                "secret directory {} does not exist",
                self.base.display()
            )));
        }
        let path = self.base.join(name);
        std::fs::write(&path, secret)
            .map_err(|e| CredentialStoreError::unavailable(format!("{}: {e}", path.display())))
    }
}

/// In-memory backend for tests and embedding.
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn read(&self, name: &str) -> Result<Option<String>, CredentialStoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CredentialStoreError::unavailable("store lock poisoned"))?;
        Ok(entries.get(name).cloned())
    }

    fn write(&self, name: &str, secret: &str) -> Result<(), CredentialStoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CredentialStoreError::unavailable("store lock poisoned"))?;
        entries.insert(name.to_string(), secret.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_and_reports_absence() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.read("api_key").unwrap(), None);
        store.write("api_key", "s3cret").unwrap();
        assert_eq!(store.read("api_key").unwrap().as_deref(), Some("s3cret"));
    }

    #[test]
    fn dir_store_distinguishes_absent_from_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirCredentialStore::new(dir.path());
        assert_eq!(store.read("api_key").unwrap(), None);

        store.write("api_key", "s3cret\n").unwrap();
        assert_eq!(store.read("api_key").unwrap().as_deref(), Some("s3cret"));

        let gone = DirCredentialStore::new(dir.path().join("missing"));
        assert!(matches!(
            gone.read("api_key"),
            Err(CredentialStoreError::Unavailable(_))
        ));
    }

    #[test]
    fn env_store_rejects_writes() {
        let store = EnvCredentialStore::default();
        assert!(store.write("api_key", "x").is_err());
    }
}
