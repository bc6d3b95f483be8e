//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use studyhub_tracking::TrackingConfig;

use crate::error::CoreError;
use crate::Result;

const DEV_API_BASE: &str = "http://127.0.0.1:5000/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Classify the host the client was served from. A port suffix is
    /// ignored.
    pub fn from_hostname(host: &str) -> Self {
        let host = host.trim().to_lowercase();
        let host = match host.rsplit_once(':') {
            Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name.to_string(),
            _ => host,
        };

        if matches!(host.as_str(), "localhost" | "127.0.0.1" | "0.0.0.0")
            || host.ends_with(".local")
        {
            Environment::Development
        } else if host.starts_with("dev.") || host.starts_with("staging.") {
            Environment::Staging
        } else {
            Environment::Production
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the local state database
    pub database_path: PathBuf,
    /// Base URL of the backend API
    pub api_base_url: String,
    pub environment: Environment,
    /// Idle threshold, flush limits and transport timeouts
    pub tracking: TrackingConfig,
    /// Number of prior messages sent with a chat request
    pub chat_history_limit: usize,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("studyhub.db"),
            api_base_url: DEV_API_BASE.to_string(),
            environment: Environment::Development,
            tracking: TrackingConfig::default(),
            chat_history_limit: 10,
        }
    }

    /// Configuration for a client served from `host`
    pub fn for_hostname(host: &str) -> Self {
        let environment = Environment::from_hostname(host);
        let api_base_url = match environment {
            Environment::Development => DEV_API_BASE.to_string(),
            Environment::Staging | Environment::Production => {
                format!("https://{}/", host.trim().to_lowercase())
            }
        };

        tracing::debug!(host = %host, environment = %environment, "Detected environment");

        Self {
            api_base_url,
            environment,
            ..Self::default()
        }
    }

    pub fn api_url(&self) -> Result<Url> {
        Url::parse(&self.api_base_url).map_err(|e| {
            CoreError::Config(format!("invalid API base URL {:?}: {}", self.api_base_url, e))
        })
    }

    /// Read a JSON config file; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))
    }

    /// `STUDYHUB_DATA_DIR` if set, otherwise the XDG data directory
    pub fn data_dir() -> PathBuf {
        std::env::var_os("STUDYHUB_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("XDG_DATA_HOME").map(|d| PathBuf::from(d).join("studyhub"))
            })
            .or_else(|| {
                std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share/studyhub"))
            })
            .unwrap_or_else(|| PathBuf::from(".studyhub"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
