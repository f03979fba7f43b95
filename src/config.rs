//! Configuration loading.
//!
//! Settings come from a JSON file in the system's standard configuration
//! directory (or an explicit path), overridden by environment variables.
//! The API client itself never reads configuration; the CLI turns a
//! `Config` into a transport and a client.

use crate::api::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "BETASERIES_URL";
/// Environment variable holding the developer API key.
pub const ENV_API_KEY: &str = "BETASERIES_API_KEY";
/// Environment variable holding the member access token.
pub const ENV_TOKEN: &str = "BETASERIES_TOKEN";
/// Environment variable overriding the API version.
pub const ENV_API_VERSION: &str = "BETASERIES_API_VERSION";

/// API version sent when none is configured.
pub const DEFAULT_API_VERSION: &str = "3.0";

const CONFIG_FILE_NAME: &str = "config.json";

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine configuration directory location.
    #[error("Failed to determine configuration directory location")]
    ConfigDirectoryNotFound,

    /// Failed to read the configuration file.
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON.
    #[error("Failed to parse config file {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// No API key was found in the file or the environment.
    #[error("No API key configured, set BETASERIES_API_KEY or api_key in the config file")]
    MissingApiKey,
}

/// Settings needed to talk to the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address of the API.
    pub base_url: String,
    /// Developer key, sent with every request.
    pub api_key: String,
    /// Member access token for calls on behalf of a member.
    pub token: Option<String>,
    /// Value of the `X-BetaSeries-Version` header.
    pub api_version: String,
    /// Request timeout in seconds, no timeout if unset.
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            token: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Loads the configuration from `path` or the default location, then
    /// applies the environment overrides.
    ///
    /// A missing file at the default location is not an error; a missing
    /// file at an explicit `path` is.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if no API
    /// key is configured anywhere.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = default_config_path()?;
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config
            .with_overrides(|name| std::env::var(name).ok())
            .validated()
    }

    /// Reads a configuration file without applying any override.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Applies overrides looked up by environment variable name.
    ///
    /// Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        if let Some(base_url) = get(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(api_key) = get(ENV_API_KEY) {
            self.api_key = api_key;
        }
        if let Some(token) = get(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(api_version) = get(ENV_API_VERSION) {
            self.api_version = api_version;
        }

        self
    }

    /// Checks that the settings required by every request are present.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(self)
    }
}

/// Returns the path of the configuration file in the standard location.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = directories::ProjectDirs::from("com", "betaseries", "betaseries")
        .ok_or(ConfigError::ConfigDirectoryNotFound)?;

    Ok(proj_dirs.config_dir().join(CONFIG_FILE_NAME))
}
