//! CLI Context for dependency injection and shared state
//!
//! Merges command line flags, environment variables and the configuration
//! file into the settings every handler works from.

use anyhow::Result;
use std::path::PathBuf;
use url::Url;
use wecom_notify::client::{NotifierClient, NotifierConfig, Recipient};
use wecom_notify::config::{Config, ConfigManager};
use wecom_notify::errors::{AppError, AppResult};

/// Options that override the configuration file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// CLI execution context containing resolved configuration
pub struct CliContext {
    pub verbose: bool,
    pub fail_on_error: bool,
    pub config_path: Option<PathBuf>,
    config: Config,
    overrides: Overrides,
}

impl CliContext {
    pub fn new(
        config_path: Option<PathBuf>,
        overrides: Overrides,
        verbose: bool,
        fail_on_error: bool,
    ) -> Result<Self> {
        let manager = ConfigManager::load(config_path)?;

        Ok(Self {
            verbose,
            fail_on_error,
            config_path: manager.config_path().map(PathBuf::from),
            config: manager.config().clone(),
            overrides,
        })
    }

    /// Initialize logging on stderr so stdout only carries results
    pub fn init_logging(&self) -> Result<()> {
        let log_level = if self.verbose {
            "debug"
        } else {
            self.config.log.level.as_str()
        };

        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env().add_directive(
                    log_level
                        .parse()
                        .unwrap_or_else(|_| tracing::Level::INFO.into()),
                ),
            )
            .init();

        if self.verbose {
            tracing::debug!("Verbose logging enabled");
            tracing::debug!("Config path: {:?}", self.config_path);
        }

        Ok(())
    }

    /// Base URL: flag or env, then file, then default.
    pub fn base_url(&self) -> &str {
        self.overrides
            .base_url
            .as_deref()
            .unwrap_or(&self.config.server.base_url)
    }

    /// Recipient for a command: flag, then the configured default.
    pub fn recipient(&self, to_user: Option<&str>) -> Recipient {
        Recipient::parse(to_user.unwrap_or(&self.config.defaults.to_user))
    }

    /// Resolve and check everything the client needs.
    pub fn notifier_config(&self) -> AppResult<NotifierConfig> {
        let base_url = self.base_url();
        let parsed = Url::parse(base_url).map_err(|e| AppError::InvalidBaseUrl {
            url: base_url.to_string(),
            source: Some(Box::new(e)),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AppError::InvalidBaseUrl {
                url: base_url.to_string(),
                source: None,
            });
        }

        let api_key = self
            .overrides
            .api_key
            .as_deref()
            .or(self.config.server.api_key.as_deref())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::config(
                    "API key is required: pass --api-key, set WECOM_NOTIFY_API_KEY or add server.api_key to the config file",
                )
            })?;

        let mut config = NotifierConfig::new(base_url, api_key);
        config.timeout_secs = self.overrides.timeout_secs.or(self.config.server.timeout_secs);
        if let Some(user_agent) = &self.config.server.user_agent {
            config = config.with_user_agent(user_agent.clone());
        }
        Ok(config)
    }

    pub fn build_client(&self) -> AppResult<NotifierClient> {
        NotifierClient::new(self.notifier_config()?)
    }
}
