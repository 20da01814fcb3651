//! Configuration module for the dshop CLI.
//!
//! Handles loading configuration from the TOML file, CLI arguments and
//! environment variables, then validates it into [`Settings`].

pub mod file;

use std::path::{Path, PathBuf};
use std::time::Duration;

use dshop_core::checkout::CheckoutConfig;
use thiserror::Error;
use url::Url;

use crate::config::file::FileConfig;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Validated runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: Url,
    pub call_timeout: Duration,
    pub script_url: Url,
    pub display_name: String,
    pub theme_color: String,
    pub session_path: PathBuf,
}

impl Settings {
    pub fn checkout_config(&self) -> CheckoutConfig {
        CheckoutConfig {
            call_timeout: self.call_timeout,
            merchant_name: self.display_name.clone(),
            theme_color: self.theme_color.clone(),
        }
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    api_url_override: Option<String>,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, api_url_override: Option<String>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            api_url_override,
        }
    }

    /// Load and validate the configuration.
    ///
    /// A missing file is not an error; every value then takes its default.
    /// The API URL from the command line or `DSHOP_API_URL` wins over the
    /// file.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let mut file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?self.config_path, "No config file, using defaults");
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(url) = &self.api_url_override {
            file_config.api.base_url = url.clone();
        }

        self.validate(file_config)
    }

    fn validate(&self, config: FileConfig) -> Result<Settings, ConfigError> {
        let api_url = parse_http_url(&config.api.base_url)?;
        let script_url = parse_http_url(&config.gateway.script_url)?;

        if config.api.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "api.timeout_secs must be greater than zero".to_owned(),
            ));
        }
        if !is_hex_color(&config.gateway.theme_color) {
            return Err(ConfigError::ValidationError(format!(
                "gateway.theme_color '{}' is not a #rrggbb colour",
                config.gateway.theme_color
            )));
        }
        if config.gateway.display_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "gateway.display_name must not be empty".to_owned(),
            ));
        }

        Ok(Settings {
            api_url,
            call_timeout: Duration::from_secs(config.api.timeout_secs),
            script_url,
            display_name: config.gateway.display_name,
            theme_color: config.gateway.theme_color,
            session_path: expand_home(&config.session.path),
        })
    }
}

fn parse_http_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_owned(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::ValidationError(format!(
            "unsupported scheme '{other}' in {raw}"
        ))),
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}
