use crate::client::BROADCAST_ALL;
use crate::errors::{AppError, AppResult};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Settings for the `wecom-notify` command line tool
///
/// Every section is optional in the file; missing values fall back to
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub defaults: DefaultsConfig,
    pub log: LogConfig,
}

/// Where the relay lives and how to talk to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: None,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub to_user: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            to_user: BROADCAST_ALL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Loads the configuration file, read-only
///
/// # Lookup
///
/// 1. **Explicit**: the path given with `--config`; it must exist.
/// 2. **User**: `~/.config/wecom-notify/config.toml`; used when present,
///    defaults otherwise.
pub struct ConfigManager {
    config_path: Option<PathBuf>,
    config: Config,
}

impl ConfigManager {
    /// Load from `explicit_path`, or from the user location when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An explicit path does not exist
    /// - The file cannot be read or is not valid TOML
    pub fn load(explicit_path: Option<PathBuf>) -> AppResult<Self> {
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(AppError::ConfigNotFound { path });
            }
            let config = Self::read(&path)?;
            return Ok(Self {
                config_path: Some(path),
                config,
            });
        }

        match Self::default_config_path() {
            Some(path) if path.exists() => {
                let config = Self::read(&path)?;
                Ok(Self {
                    config_path: Some(path),
                    config,
                })
            }
            _ => Ok(Self {
                config_path: None,
                config: Config::default(),
            }),
        }
    }

    /// `~/.config/wecom-notify/config.toml`, if a home directory is known.
    pub fn default_config_path() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| {
            dirs.home_dir()
                .join(".config")
                .join("wecom-notify")
                .join("config.toml")
        })
    }

    fn read(path: &Path) -> AppResult<Config> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::io_with_source(path, "read config file", e))?;
        Ok(toml::from_str(&content)?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// File the configuration came from, `None` when running on defaults.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
