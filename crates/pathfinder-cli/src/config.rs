//! Configuration file handling for the pathfinder CLI

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pathfinder_provider::ProviderConfig;
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default device address
    pub address: Option<String>,
    /// Default API key
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Default output format
    pub output: Option<OutputFormat>,
    /// Disable colored output
    pub no_color: Option<bool>,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("pathfinder");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    ///
    /// Arguments already include their environment fallbacks.
    pub fn merge_with_args(
        &self,
        address: Option<&str>,
        api_key: Option<&str>,
        output: Option<OutputFormat>,
        no_color: bool,
    ) -> MergedConfig {
        let mut provider = ProviderConfig::default();
        provider.address = address.map(String::from).or_else(|| self.address.clone());
        provider.api_key = api_key.map(String::from).or_else(|| self.api_key.clone());
        if let Some(timeout) = self.timeout_secs {
            provider.timeout_secs = timeout;
        }

        MergedConfig {
            provider,
            output: output.or(self.output).unwrap_or_default(),
            no_color: no_color || self.no_color.unwrap_or(false),
        }
    }
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub provider: ProviderConfig,
    pub output: OutputFormat,
    pub no_color: bool,
}
