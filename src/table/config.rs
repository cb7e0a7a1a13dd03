//! Configuration options for a blackjack table.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settlement::UserId;

/// Balance assumed until the settlement service reports one.
pub const DEFAULT_STARTING_BALANCE: f64 = 1000.0;

/// Configuration for a [`Table`](super::Table).
///
/// # Example
/// ```
/// use blackjack_table::table::TableConfig;
///
/// let config = TableConfig::default().with_seed(7).with_api_url("http://localhost:3001");
/// assert!(config.validate().is_ok());
/// assert_eq!(config.starting_balance, 1000.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// User whose balance is settled.
    pub user_id: UserId,

    /// Base URL of the settlement service.
    ///
    /// `None` settles against an in-process ledger.
    pub api_url: Option<String>,

    /// Balance shown before the first query to the settlement service, and
    /// the opening balance of ledger accounts.
    pub starting_balance: f64,

    /// Timeout for each settlement request, in milliseconds.
    pub request_timeout_ms: u64,

    /// Random seed for reproducible dealing. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            user_id: UserId::Number(1),
            api_url: None,
            starting_balance: DEFAULT_STARTING_BALANCE,
            request_timeout_ms: 5_000,
            seed: None,
        }
    }
}

impl TableConfig {
    /// Create a new TableConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the user.
    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }

    /// Builder method: settle against a remote service.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Builder method: set the starting balance.
    pub fn with_starting_balance(mut self, balance: f64) -> Self {
        self.starting_balance = balance;
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.starting_balance.is_finite() || self.starting_balance < 0.0 {
            return Err(ConfigError::InvalidBalance(self.starting_balance));
        }

        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        if let Some(url) = &self.api_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Starting balance is negative or not a number.
    #[error("starting balance {0} must be a non-negative number")]
    InvalidBalance(f64),
    /// Request timeout is zero.
    #[error("request timeout must be greater than zero")]
    InvalidTimeout,
    /// Settlement URL is not http or https.
    #[error("API URL {0} must start with http:// or https://")]
    InvalidUrl(String),
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(String),
    /// Config file is not valid JSON for this struct.
    #[error("failed to parse config: {0}")]
    Parse(String),
}
