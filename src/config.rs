//! Configuration management for Quizmate
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{QuizmateError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Main configuration structure for Quizmate
///
/// This structure holds everything the client needs to talk to the quiz
/// backend: the REST endpoint, push channel tuning, and gameplay settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Realtime push channel settings
    #[serde(default)]
    pub push: PushConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the quiz backend (e.g. `https://quiz.example.com`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Realtime push channel configuration
///
/// The polling interval drives the REST fallback used while the push channel
/// is disconnected. The reconnect fields define the bounded exponential
/// backoff schedule for re-establishing the socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Polling fallback interval in milliseconds (used while disconnected)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Initial reconnect delay in milliseconds
    #[serde(default = "default_reconnect_base")]
    pub reconnect_base_ms: u64,

    /// Maximum reconnect delay in milliseconds
    #[serde(default = "default_reconnect_cap")]
    pub reconnect_cap_ms: u64,
}

fn default_poll_interval() -> u64 {
    1_000
}

fn default_reconnect_base() -> u64 {
    1_000
}

fn default_reconnect_cap() -> u64 {
    30_000
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            reconnect_base_ms: default_reconnect_base(),
            reconnect_cap_ms: default_reconnect_cap(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file with an optional API URL override
    ///
    /// A missing file is not an error; defaults are used so the CLI works out
    /// of the box against a local backend. The override (typically from the
    /// `--api-url` flag or `QUIZMATE_API_URL`) wins over the file value.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `api_url_override` - Optional base URL that replaces the file value
    ///
    /// # Errors
    ///
    /// Returns [`QuizmateError::Yaml`] when the file exists but cannot be
    /// parsed, or [`QuizmateError::Io`] when it exists but cannot be read.
    pub fn load(path: &str, api_url_override: Option<&str>) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path).map_err(QuizmateError::Io)?;
            serde_yaml::from_str(&contents).map_err(QuizmateError::Yaml)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", path);
            Self::default()
        };

        if let Some(url) = api_url_override {
            config.api.base_url = url.to_string();
        }

        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`QuizmateError::Config`] when the base URL does not parse,
    /// uses a non-HTTP scheme, or when an interval is zero.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api.base_url).map_err(|e| {
            QuizmateError::Config(format!("invalid api.base_url '{}': {}", self.api.base_url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(QuizmateError::Config(format!(
                "api.base_url must be http or https, got '{}'",
                url.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(QuizmateError::Config("api.timeout_seconds must be > 0".to_string()).into());
        }

        if self.push.poll_interval_ms == 0 {
            return Err(
                QuizmateError::Config("push.poll_interval_ms must be > 0".to_string()).into(),
            );
        }

        if self.push.reconnect_base_ms == 0 || self.push.reconnect_cap_ms < self.push.reconnect_base_ms
        {
            return Err(QuizmateError::Config(
                "push.reconnect_base_ms must be > 0 and <= push.reconnect_cap_ms".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
