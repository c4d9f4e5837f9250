//! Provider configuration
//!
//! The host hands the provider a decoded configuration block and is
//! responsible for any environment fallbacks.

use std::fmt;
use std::time::Duration;

use pathfinder_client::{ClientConfig, ClientError, PathfinderClient};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Errors raised while turning configuration into a client
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No device address configured; set `address` or PATHFINDER_ADDRESS")]
    MissingAddress,

    #[error("Invalid device address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error(transparent)]
    Client(#[from] ClientError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Connection settings for one device
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the device API, e.g. `http://rover.local:8080`
    #[serde(default)]
    pub address: Option<String>,
    /// Sent as a bearer token when present
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            address: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("address", &self.address)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Parse and check the configured address
    pub fn validate(&self) -> Result<Url> {
        let address = self.address.as_deref().ok_or(ConfigError::MissingAddress)?;

        let invalid = |reason: String| ConfigError::InvalidAddress {
            address: address.to_string(),
            reason,
        };

        let url = Url::parse(address).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(format!("unsupported scheme '{}'", other))),
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }

        Ok(url)
    }

    /// Transport settings derived from this configuration
    pub fn client_config(&self) -> Result<ClientConfig> {
        let url = self.validate()?;

        let mut config = ClientConfig::new(url.as_str()).timeouts(
            Duration::from_secs(self.timeout_secs),
            Duration::from_secs(self.connect_timeout_secs),
        );
        if let Some(key) = &self.api_key {
            config = config.api_key(key.clone());
        }
        Ok(config)
    }

    /// Build the HTTP client for this device
    pub fn build_client(&self) -> Result<PathfinderClient> {
        Ok(PathfinderClient::with_config(self.client_config()?)?)
    }
}
