//! Configuration resolution.
//!
//! Precedence per key: explicit assignment > environment > config file >
//! built-in default. The config file is loaded lazily and at most once;
//! `reload` clears the cache for test isolation. Nothing here is cached by
//! the client — every RPC call resolves through these getters again.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Deserialize;

use crate::credentials::CredentialStore;
use crate::error::{ConfigurationError, ConfigurationResult};

/// SOAP endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://secure.clearbooks.co.uk/api/soap/";

/// Config file consulted when no explicit path is given.
pub const DEFAULT_CONFIG_PATH: &str = ".clearbooks/config.yaml";

const ENV_API_KEY: &str = "CLEARBOOKS_API_KEY";
const ENV_ENDPOINT: &str = "CLEARBOOKS_ENDPOINT";
const ENV_LOG: &str = "CLEARBOOKS_LOG";
const ENV_LOG_FILTER: &str = "CLEARBOOKS_LOG_FILTER";

/// Recognized config-file keys. Unknown keys are tolerated.
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    log: Option<bool>,
    #[serde(default)]
    log_filter: Option<String>,
}

/// Resolved operational parameters for the client.
#[derive(Default)]
pub struct Configuration {
    api_key: Option<String>,
    endpoint: Option<String>,
    log: Option<bool>,
    log_filter: Option<String>,
    config_path: Option<PathBuf>,
    credential_store: Option<Arc<dyn CredentialStore>>,
    file_cache: Mutex<Option<FileConfig>>,
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("log", &self.log)
            .field("log_filter", &self.log_filter)
            .field("config_path", &self.config_path)
            .field("credential_store", &self.credential_store.is_some())
            .finish()
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a caller-supplied mutation in one scoped pass. Safe to call
    /// repeatedly; the last assignment per key wins.
    pub fn configure(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self {
        f(self);
        self
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) -> &mut Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn clear_api_key(&mut self) -> &mut Self {
        self.api_key = None;
        self
    }

    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) -> &mut Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn set_log(&mut self, log: bool) -> &mut Self {
        self.log = Some(log);
        self
    }

    pub fn set_log_filter(&mut self, filter: impl Into<String>) -> &mut Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Use an explicit config file instead of [`DEFAULT_CONFIG_PATH`]. A
    /// missing explicit path is an error at first resolution.
    pub fn set_config_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn set_credential_store(&mut self, store: Arc<dyn CredentialStore>) -> &mut Self {
        self.credential_store = Some(store);
        self
    }

    pub fn credential_store(&self) -> Option<&Arc<dyn CredentialStore>> {
        self.credential_store.as_ref()
    }

    /// Drop the cached config file so the next getter re-reads it.
    pub fn reload(&self) {
        if let Ok(mut cache) = self.file_cache.lock() {
            *cache = None;
        }
    }

    /// Plain-config API key per the precedence chain.
    pub fn api_key(&self) -> ConfigurationResult<Option<String>> {
        if let Some(key) = &self.api_key {
            return Ok(Some(key.clone()));
        }
        if let Some(key) = env_text(ENV_API_KEY) {
            return Ok(Some(key));
        }
        Ok(self.file()?.api_key)
    }

    /// API key with the credential store consulted first: a stored secret
    /// always overrides a plain-config value.
    pub fn resolved_api_key(&self) -> ConfigurationResult<Option<String>> {
        if let Some(store) = &self.credential_store {
            if let Some(secret) = store.read("api_key")? {
                return Ok(Some(secret));
            }
        }
        self.api_key()
    }

    pub fn endpoint(&self) -> ConfigurationResult<String> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(endpoint.clone());
        }
        if let Some(endpoint) = env_text(ENV_ENDPOINT) {
            return Ok(endpoint);
        }
        if let Some(endpoint) = self.file()?.endpoint {
            return Ok(endpoint);
        }
        Ok(DEFAULT_ENDPOINT.to_string())
    }

    pub fn log(&self) -> ConfigurationResult<bool> {
        if let Some(log) = self.log {
            return Ok(log);
        }
        if let Some(raw) = env_text(ENV_LOG) {
            return Ok(matches!(raw.as_str(), "true" | "1"));
        }
        Ok(self.file()?.log.unwrap_or(false))
    }

    pub fn log_filter(&self) -> ConfigurationResult<Option<String>> {
        if let Some(filter) = &self.log_filter {
            return Ok(Some(filter.clone()));
        }
        if let Some(filter) = env_text(ENV_LOG_FILTER) {
            return Ok(Some(filter));
        }
        Ok(self.file()?.log_filter)
    }

    fn file(&self) -> ConfigurationResult<FileConfig> {
        let mut cache = self
            .file_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(file) = cache.as_ref() {
            return Ok(file.clone());
        }
        let loaded = self.load_file()?;
        *cache = Some(loaded.clone());
        Ok(loaded)
    }

    fn load_file(&self) -> ConfigurationResult<FileConfig> {
        match &self.config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigurationError::MissingFile(path.clone()));
                }
                parse_file(path)
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if !path.exists() {
                    return Ok(FileConfig::default());
                }
                // The default file is best-effort: never fatal.
                parse_file(path).or_else(|e| {
                    tracing::warn!(error = %e, "ignoring unreadable default config file");
                    Ok(FileConfig::default())
                })
            }
        }
    }
}

fn parse_file(path: &Path) -> ConfigurationResult<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigurationError::invalid_file(path, e.to_string()))?;
    serde_yaml::from_str(&raw)
        .map_err(|e| ConfigurationError::invalid_file(path, e.to_string()))
}

fn env_text(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn explicit_value_wins_over_file() {
        let file = config_file("endpoint: https://file.example/soap\n");
        let mut config = Configuration::new();
        config.configure(|c| {
            c.set_config_path(file.path());
            c.set_endpoint("https://explicit.example/soap");
        });
        assert_eq!(config.endpoint().unwrap(), "https://explicit.example/soap");
    }

    #[test]
    fn file_value_wins_over_default() {
        let file = config_file("endpoint: https://file.example/soap\nlog: true\n");
        let mut config = Configuration::new();
        config.set_config_path(file.path());
        assert_eq!(config.endpoint().unwrap(), "https://file.example/soap");
        assert!(config.log().unwrap());
    }

    #[test]
    fn built_in_default_is_the_last_resort() {
        let file = config_file("log: false\n");
        let mut config = Configuration::new();
        config.set_config_path(file.path());
        assert_eq!(config.endpoint().unwrap(), DEFAULT_ENDPOINT);
        assert_eq!(config.log_filter().unwrap(), None);
    }

    #[test]
    fn environment_beats_file_and_loses_to_explicit() {
        let file = config_file("api_key: from-file\n");
        let mut config = Configuration::new();
        config.set_config_path(file.path());

        // Env manipulation stays inside this single test to avoid races.
        unsafe { std::env::set_var(ENV_API_KEY, "from-env") };
        assert_eq!(config.api_key().unwrap().as_deref(), Some("from-env"));

        config.set_api_key("from-explicit");
        assert_eq!(config.api_key().unwrap().as_deref(), Some("from-explicit"));

        config.clear_api_key();
        assert_eq!(config.api_key().unwrap().as_deref(), Some("from-env"));

        unsafe { std::env::remove_var(ENV_API_KEY) };
        assert_eq!(config.api_key().unwrap().as_deref(), Some("from-file"));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let mut config = Configuration::new();
        config.set_config_path("/nonexistent/clearbooks.yaml");
        assert!(matches!(
            config.endpoint(),
            Err(ConfigurationError::MissingFile(_))
        ));
    }

    #[test]
    fn malformed_explicit_file_is_an_error() {
        let file = config_file("endpoint: [not, a, string\n");
        let mut config = Configuration::new();
        config.set_config_path(file.path());
        assert!(matches!(
            config.endpoint(),
            Err(ConfigurationError::InvalidFile { .. })
        ));
    }

    #[test]
    fn file_loads_once_until_reload() {
        let file = config_file("endpoint: https://first.example/\n");
        let mut config = Configuration::new();
        config.set_config_path(file.path());
        assert_eq!(config.endpoint().unwrap(), "https://first.example/");

        std::fs::write(file.path(), "endpoint: https://second.example/\n").unwrap();
        assert_eq!(config.endpoint().unwrap(), "https://first.example/");

        config.reload();
        assert_eq!(config.endpoint().unwrap(), "https://second.example/");
    }

    #[test]
    fn credential_store_overrides_plain_config() {
        use crate::credentials::{CredentialStore, MemoryCredentialStore};

        let mut config = Configuration::new();
        config.set_api_key("plain-key");

        let store = Arc::new(MemoryCredentialStore::new());
        config.set_credential_store(store.clone());
        assert_eq!(
            config.resolved_api_key().unwrap().as_deref(),
            Some("plain-key")
        );

        store.write("api_key", "stored-key").unwrap();
        assert_eq!(
            config.resolved_api_key().unwrap().as_deref(),
            Some("stored-key")
        );
    }
}
