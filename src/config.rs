//! Runtime configuration
//!
//! Loaded from the process environment (after reading an optional `.env`).
//! The Gemini API key is the only secret; everything else has a default.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::recommend::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_MODEL: &str = "GEMINI_MODEL";
pub const ENV_BASE_URL: &str = "GEMINI_BASE_URL";
pub const ENV_TIMEOUT: &str = "LIFESTYLE_TIMEOUT_SECONDS";
pub const ENV_SINK_URL: &str = "LIFESTYLE_SINK_URL";
pub const ENV_HISTORY_DIR: &str = "LIFESTYLE_HISTORY_DIR";
pub const ENV_LOG_LEVEL: &str = "LIFESTYLE_LOG_LEVEL";

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} must be a positive number of seconds, got '{value}'")]
    InvalidTimeout { key: &'static str, value: String },

    #[error("{key} must be an http(s) URL, got '{value}'")]
    InvalidUrl { key: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LifestyleConfig {
    pub recommender: RecommenderConfig,
    pub sink: SinkConfig,
    pub history: HistoryConfig,
    pub telemetry: TelemetryConfig,
}

/// Recommendation provider settings
#[derive(Clone, PartialEq)]
pub struct RecommenderConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for RecommenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecommenderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RecommenderConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Logging sink settings; no URL means submissions are not logged
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    pub url: Option<String>,
    pub timeout: Duration,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Local history settings; no directory means history is kept in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryConfig {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl LifestyleConfig {
    /// Read `.env` if present, then the process environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timeout = match get(ENV_TIMEOUT) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        };

        let base_url = match get(ENV_BASE_URL) {
            Some(url) => check_url(ENV_BASE_URL, url)?,
            None => DEFAULT_BASE_URL.to_string(),
        };

        let sink_url = get(ENV_SINK_URL)
            .map(|url| check_url(ENV_SINK_URL, url))
            .transpose()?;

        Ok(Self {
            recommender: RecommenderConfig {
                api_key: get(ENV_API_KEY),
                model: get(ENV_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url,
                timeout,
            },
            sink: SinkConfig {
                url: sink_url,
                timeout,
            },
            history: HistoryConfig {
                dir: get(ENV_HISTORY_DIR).map(PathBuf::from),
            },
            telemetry: TelemetryConfig {
                log_level: get(ENV_LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            },
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            key: ENV_TIMEOUT,
            value: raw.to_string(),
        }),
    }
}

fn check_url(key: &'static str, url: String) -> Result<String, ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url)
    } else {
        Err(ConfigError::InvalidUrl { key, value: url })
    }
}
