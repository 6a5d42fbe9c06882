//! Configuration management for `sticky_wall`.
//!
//! Configuration is loaded from YAML with support for:
//! - User config (`$XDG_CONFIG_HOME/sticky-wall/config.yaml` or
//!   `~/.config/sticky-wall/config.yaml`), or an explicit file
//! - Environment variable overrides (`STICKY_WALL_DATA_DIR`,
//!   `STICKY_WALL_LOG`, `STICKY_WALL_LOG_JSON`)
//!
//! Every field has a default, so an absent or empty file is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::logging::LoggingConfig;
use crate::storage::HistoryConfig;

const APP_DIR: &str = "sticky-wall";
const CONFIG_FILE: &str = "config.yaml";

pub const ENV_DATA_DIR: &str = "STICKY_WALL_DATA_DIR";
pub const ENV_LOG: &str = "STICKY_WALL_LOG";
pub const ENV_LOG_JSON: &str = "STICKY_WALL_LOG_JSON";

/// Errors raised while building a [`Config`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid value for {var}: '{value}'")]
    InvalidEnv { var: String, value: String },
}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the stored keys. Unset means the platform default.
    pub data_dir: Option<PathBuf>,
    pub logging: LoggingConfig,
    pub history: HistoryConfig,
}

impl Config {
    /// Load from the user config file (or `explicit`) and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a file cannot be read or parsed, or an
    /// override has an invalid value.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(explicit, |var: &str| std::env::var(var).ok())
    }

    /// [`load`](Self::load) with an injectable environment lookup.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_with(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match user_config_path(&env) {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env_overrides(&env)?;
        if config.data_dir.is_none() {
            config.data_dir = Some(default_data_dir(&env));
        }
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `Read` or `Parse`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse YAML; an empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns the YAML error for malformed input or unknown value types.
    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    fn apply_env_overrides(
        &mut self,
        env: &impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(dir) = env(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = env(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            self.logging.level = level;
        }
        if let Some(raw) = env(ENV_LOG_JSON) {
            self.logging.json = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: ENV_LOG_JSON.to_string(),
                        value: raw,
                    });
                }
            };
        }
        Ok(())
    }

    /// The configured data directory, or the platform default.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| default_data_dir(&|var: &str| std::env::var(var).ok()))
    }
}

fn user_config_path(env: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    env("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| env("HOME").map(|home| Path::new(&home).join(".config")))
        .map(|base| base.join(APP_DIR).join(CONFIG_FILE))
}

fn default_data_dir(env: &impl Fn(&str) -> Option<String>) -> PathBuf {
    env("XDG_DATA_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| env("HOME").map(|home| Path::new(&home).join(".local").join("share")))
        .map_or_else(|| PathBuf::from(".").join(APP_DIR), |base| base.join(APP_DIR))
}
