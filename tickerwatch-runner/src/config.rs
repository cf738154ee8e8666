//! TOML configuration for the provider, retry policy, and notifications.
//!
//! Every field has a default, so an empty file (or no file) is a valid config:
//!
//! ```toml
//! [provider]
//! base_url = "https://data.nasdaq.com/api/v3/datatables"
//! dataset = "WIKI/PRICES"
//! timeout_secs = 30
//!
//! [retry]
//! max_retries = 3
//! base_delay_ms = 0
//!
//! [notify]
//! recipient = "me@example.com"
//! webhook_url = "https://hooks.example.com/services/T000/B000"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tickerwatch_core::data::quandl::{DEFAULT_BASE_URL, DEFAULT_DATASET, DEFAULT_TIMEOUT};
use tickerwatch_core::data::{DataError, QuandlProvider};

use crate::notify::{Notifier, NotifyError, StdoutNotifier, WebhookNotifier};
use crate::retry::{RetryPolicy, DEFAULT_MAX_RETRIES};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerwatchConfig {
    pub provider: ProviderConfig,
    pub retry: RetryConfig,
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub dataset: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: 0,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.base_delay_ms))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub recipient: Option<String>,
    /// When unset, results are printed to stdout.
    pub webhook_url: Option<String>,
}

impl TickerwatchConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn build_provider(&self) -> Result<QuandlProvider, DataError> {
        QuandlProvider::new(
            &self.provider.base_url,
            &self.provider.dataset,
            Duration::from_secs(self.provider.timeout_secs),
        )
    }

    /// Webhook sink if a URL is configured, stdout otherwise.
    pub fn build_notifier(&self) -> Result<Box<dyn Notifier>, NotifyError> {
        match &self.notify.webhook_url {
            Some(url) => {
                let timeout = Duration::from_secs(self.provider.timeout_secs);
                Ok(Box::new(WebhookNotifier::new(url, timeout)?))
            }
            None => Ok(Box::new(StdoutNotifier)),
        }
    }
}
