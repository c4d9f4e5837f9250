//! Read-only device status snapshots
//!
//! These have no identity beyond "the value as of the last successful read".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Device identity and software versions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub name: String,
    /// Uptime in seconds
    pub uptime: f64,
    #[serde(default)]
    pub identifiers: Option<DeviceIdentifiers>,
    #[serde(default)]
    pub versions: Option<DeviceVersions>,
    /// Feature name to enabled flag
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentifiers {
    pub long: String,
    pub short: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceVersions {
    /// Version of the device API
    pub api: String,
    /// Version of the application running on the device
    pub app: String,
}

/// Battery charge level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryStatus {
    pub value: i64,
    pub unit: String,
}

/// A network seen by the device's Wi-Fi scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WifiNetwork {
    pub ssid: String,
    /// Signal strength in dBm
    pub rssi: f64,
    pub encrypted: bool,
}

/// Result of a Wi-Fi scan, in the order the device reported it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WifiNetworks {
    pub networks: Vec<WifiNetwork>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub healthy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyStatus {
    pub ready: bool,
}

/// Whether the device currently refuses new movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementLockStatus {
    pub locked: bool,
}
