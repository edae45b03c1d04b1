//! Configuration management for the `DevClub` client

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Session persistence configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Registration flow configuration
    #[serde(default)]
    pub registration: RegistrationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// Session persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File holding the persisted token slot
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

/// Registration flow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Number of characters in a verification code
    #[serde(default = "default_otp_length")]
    pub otp_length: usize,

    /// Cosmetic countdown before "resend" unlocks, in seconds
    #[serde(default = "default_otp_countdown")]
    pub otp_countdown_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

const fn default_request_timeout() -> u64 {
    30
}

fn default_token_file() -> PathBuf {
    PathBuf::from(".devclub/session.json")
}

const fn default_otp_length() -> usize {
    6
}

const fn default_otp_countdown() -> u64 {
    300 // 5 minutes
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            otp_length: default_otp_length(),
            otp_countdown_secs: default_otp_countdown(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from an optional file and the environment
    ///
    /// Without an explicit path, `devclub.toml` (or any supported extension)
    /// in the working directory is used when present. `DEVCLUB_*` variables
    /// override file values, with `__` separating sections, e.g.
    /// `DEVCLUB_API__BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        debug!(path = ?path, "Loading configuration");
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("devclub").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("DEVCLUB")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        loaded.validate()?;
        debug!(
            base_url = %loaded.api.base_url,
            token_file = %loaded.session.token_file.display(),
            "Configuration loaded"
        );
        Ok(loaded)
    }

    /// Check invariants serde defaults cannot express
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the offending field.
    pub fn validate(&self) -> crate::Result<()> {
        self.check().inspect_err(|e| warn!("Invalid configuration: {}", e))
    }

    fn check(&self) -> crate::Result<()> {
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(crate::Error::Configuration {
                message: format!("api.base_url must be an http(s) URL, got '{}'", self.api.base_url),
            });
        }
        if self.api.request_timeout == 0 {
            return Err(crate::Error::Configuration {
                message: "api.request_timeout must be greater than zero".to_string(),
            });
        }
        if self.registration.otp_length == 0 {
            return Err(crate::Error::Configuration {
                message: "registration.otp_length must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Request timeout as a `Duration`
    pub const fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.api.request_timeout)
    }
}
