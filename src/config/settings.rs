//! Configuration settings structures for dingrelay
//!
//! This module defines all configuration structures that can be loaded from
//! a TOML file and environment variables. Credential fields additionally
//! fall back to the `DINGTALK_*` environment variables the platform tooling
//! conventionally uses.

use std::path::{Path, PathBuf};

use config::{Config, Environment as EnvSource, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::config::environment::Environment;
use crate::config::error::ConfigError;
use crate::logger::LoggerConfig;

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "DINGRELAY";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Environment variable for the configuration directory
const CONFIG_DIR_ENV: &str = "DINGRELAY_CONFIG_DIR";

/// Default configuration directory for layered loading
const DEFAULT_CONFIG_DIR: &str = "config";

// ============================================================================
// Default value functions
// ============================================================================

fn default_base_url() -> String {
    "https://api.dingtalk.com/v1.0".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

// ============================================================================
// API Configuration
// ============================================================================

/// DingTalk open-platform API endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the platform HTTP API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds, bounding each outbound call
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Optional proxy server, `http://host:port`
    #[serde(default)]
    pub proxy: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            proxy: None,
        }
    }
}

// ============================================================================
// Credentials Configuration
// ============================================================================

/// Credentials for authenticating to the platform
///
/// Either a pre-issued `access_token` or the `client_id`/`client_secret`
/// pair must be present. `robot_code` identifies the sending robot and is
/// always required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Application client id (appKey)
    #[serde(default)]
    pub client_id: Option<String>,

    /// Application client secret (appSecret)
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Pre-issued access token, skips the OAuth exchange
    #[serde(default)]
    pub access_token: Option<String>,

    /// Robot code of the sending robot
    #[serde(default)]
    pub robot_code: Option<String>,
}

impl CredentialsConfig {
    /// Whether the OAuth client pair is fully present
    pub fn has_client_pair(&self) -> bool {
        non_empty(&self.client_id) && non_empty(&self.client_secret)
    }

    /// Whether a usable pre-issued token is present
    pub fn has_access_token(&self) -> bool {
        non_empty(&self.access_token)
    }
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

// ============================================================================
// Logger Configuration
// ============================================================================

/// Logger configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Colored console output (only applied on a TTY)
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            colored: default_true(),
        }
    }
}

impl LoggerSettings {
    /// Convert into the logger module's configuration
    pub fn into_logger_config(self) -> LoggerConfig {
        LoggerConfig {
            level: self.level,
            colored: self.colored,
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Complete application settings
///
/// This structure represents the entire configuration that can be loaded
/// from a TOML file and environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Platform API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Platform credentials
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerSettings,
}

impl Settings {
    /// Load settings from TOML configuration plus environment variables
    ///
    /// With an explicit `config_file` the file must exist and is the only
    /// file source. Otherwise layered loading applies, from the directory
    /// named by `DINGRELAY_CONFIG_DIR` (default `config/`), all optional:
    /// 1. `default.toml`
    /// 2. `{environment}.toml` per `DINGRELAY_APP_ENV`
    /// 3. `local.toml`
    ///
    /// `DINGRELAY_*` environment variables override file values
    /// (`DINGRELAY_API__PROXY` maps to `api.proxy`), and `DINGTALK_*`
    /// credential fallbacks fill fields still unset. The loaded settings
    /// are validated before being returned.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::file_not_found(path.display().to_string()));
            }
            builder = builder.add_source(
                File::new(path.to_str().unwrap_or_default(), FileFormat::Toml).required(true),
            );
        } else {
            let config_dir = std::env::var(CONFIG_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));
            let environment = Environment::from_env();

            for file in [
                config_dir.join("default.toml"),
                config_dir.join(format!("{}.toml", environment.as_str())),
                config_dir.join("local.toml"),
            ] {
                builder = builder.add_source(
                    File::new(file.to_str().unwrap_or_default(), FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let config = builder
            .add_source(
                EnvSource::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.apply_credential_fallbacks();
        settings.validate()?;

        Ok(settings)
    }

    /// Fill unset credential fields from the conventional `DINGTALK_*`
    /// environment variables
    fn apply_credential_fallbacks(&mut self) {
        let creds = &mut self.credentials;
        fallback_from_env(&mut creds.client_id, "DINGTALK_CLIENT_ID");
        fallback_from_env(&mut creds.client_secret, "DINGTALK_CLIENT_SECRET");
        fallback_from_env(&mut creds.access_token, "DINGTALK_ACCESS_TOKEN");
        fallback_from_env(&mut creds.robot_code, "DINGTALK_ROBOT_CODE");
    }

    /// Validate the loaded settings
    ///
    /// Checks performed once at load time; the rest of the crate treats a
    /// `Settings` value as known-good.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.api.base_url).map_err(|e| {
            ConfigError::validation("api.base_url".to_string(), format!("invalid URL: {}", e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::validation(
                "api.base_url",
                "URL must use http or https protocol",
            ));
        }

        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "api.timeout_seconds",
                "timeout must be greater than zero",
            ));
        }

        if !self.credentials.has_access_token() && !self.credentials.has_client_pair() {
            return Err(ConfigError::validation(
                "credentials",
                "either access_token or the client_id/client_secret pair is required",
            ));
        }

        if !non_empty(&self.credentials.robot_code) {
            return Err(ConfigError::validation(
                "credentials.robot_code",
                "robot_code is required",
            ));
        }

        match self.logger.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::validation(
                    "logger.level".to_string(),
                    format!(
                        "Invalid log level '{}'. Valid levels are: trace, debug, info, warn, error",
                        other
                    ),
                ));
            }
        }

        Ok(())
    }
}

fn fallback_from_env(field: &mut Option<String>, var: &str) {
    if non_empty(field) {
        return;
    }
    if let Ok(value) = std::env::var(var)
        && !value.trim().is_empty()
    {
        *field = Some(value);
    }
}
