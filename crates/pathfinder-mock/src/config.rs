//! TOML configuration for the simulated device
//!
//! Declares the snapshot the read-only endpoints report. Everything has a
//! default, so an empty file (or no file) yields a healthy, ready rover.

use std::collections::BTreeMap;
use std::path::Path;

use pathfinder_core::{
    BatteryStatus, DeviceIdentifiers, DeviceStatus, DeviceVersions, WifiNetwork,
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MockConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// `[device]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceSection {
    pub name: String,
    pub long_id: String,
    pub short_id: String,
    pub api_version: String,
    pub app_version: String,
    pub features: BTreeMap<String, bool>,
}

impl Default for DeviceSection {
    fn default() -> Self {
        Self {
            name: "pathfinder".to_string(),
            long_id: "pathfinder-0000-0001".to_string(),
            short_id: "pf01".to_string(),
            api_version: "1.0.0".to_string(),
            app_version: "0.1.0".to_string(),
            features: BTreeMap::from([("camera".to_string(), true), ("lidar".to_string(), false)]),
        }
    }
}

/// `[battery]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatterySection {
    pub value: i64,
    pub unit: String,
}

impl Default for BatterySection {
    fn default() -> Self {
        Self {
            value: 100,
            unit: "%".to_string(),
        }
    }
}

/// One `[[wifi]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct WifiSection {
    pub ssid: String,
    pub rssi: f64,
    #[serde(default)]
    pub encrypted: bool,
}

/// Top-level simulator configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    pub device: DeviceSection,
    pub battery: BatterySection,
    pub wifi: Vec<WifiSection>,
    pub healthy: bool,
    pub ready: bool,
    /// Bearer key required on every request; auth is off when unset
    pub api_key: Option<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            device: DeviceSection::default(),
            battery: BatterySection::default(),
            wifi: vec![WifiSection {
                ssid: "basecamp".to_string(),
                rssi: -42.0,
                encrypted: true,
            }],
            healthy: true,
            ready: true,
            api_key: None,
        }
    }
}

impl MockConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MockConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| MockConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content).map_err(|source| MockConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn device_status(&self) -> DeviceStatus {
        DeviceStatus {
            name: self.device.name.clone(),
            uptime: 0.0,
            identifiers: Some(DeviceIdentifiers {
                long: self.device.long_id.clone(),
                short: self.device.short_id.clone(),
            }),
            versions: Some(DeviceVersions {
                api: self.device.api_version.clone(),
                app: self.device.app_version.clone(),
            }),
            features: self.device.features.clone(),
        }
    }

    pub fn battery_status(&self) -> BatteryStatus {
        BatteryStatus {
            value: self.battery.value,
            unit: self.battery.unit.clone(),
        }
    }

    pub fn wifi_networks(&self) -> Vec<WifiNetwork> {
        self.wifi
            .iter()
            .map(|w| WifiNetwork {
                ssid: w.ssid.clone(),
                rssi: w.rssi,
                encrypted: w.encrypted,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = MockConfig::parse("").unwrap();
        assert!(config.healthy);
        assert!(config.ready);
        assert_eq!(config.api_key, None);
        assert_eq!(config.battery_status().value, 100);
        assert_eq!(config.wifi_networks().len(), 1);
    }

    #[test]
    fn test_partial_sections() {
        let config = MockConfig::parse(
            r#"
            ready = false
            api_key = "s3cret"

            [battery]
            value = 12

            [device.features]
            arm = true

            [[wifi]]
            ssid = "field"
            rssi = -71.5

            [[wifi]]
            ssid = "lab"
            rssi = -30.0
            encrypted = true
            "#,
        )
        .unwrap();

        assert!(!config.ready);
        assert_eq!(config.api_key.as_deref(), Some("s3cret"));
        assert_eq!(config.battery_status().unit, "%");
        assert_eq!(config.battery_status().value, 12);
        assert_eq!(config.device_status().features.get("arm"), Some(&true));
        assert_eq!(config.device_status().name, "pathfinder");

        let ssids: Vec<String> = config.wifi_networks().into_iter().map(|w| w.ssid).collect();
        assert_eq!(ssids, vec!["field", "lab"]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "healthy = false").unwrap();

        let config = MockConfig::load(file.path()).unwrap();
        assert!(!config.healthy);
    }

    #[test]
    fn test_load_errors_name_the_path() {
        let err = MockConfig::load("/nonexistent/mock.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/mock.toml"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "healthy = \"very\"").unwrap();
        assert!(matches!(
            MockConfig::load(file.path()),
            Err(MockConfigError::Parse { .. })
        ));
    }
}
