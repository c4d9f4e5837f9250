//! Request and response records of the control API

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use pathfinder_core::{
    BatteryStatus, DeviceIdentifiers, DeviceStatus, DeviceVersions, Direction, HealthStatus,
    MovementLockStatus, MovementPlan, ReadyStatus, Step, WifiNetwork,
};

use crate::codec::{ensure_finite, CodecError, Envelope};

// =============================================================================
// Device Status
// =============================================================================

/// `GET /v1/device/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceResponse {
    pub name: String,
    pub uptime: f64,
    #[serde(default)]
    pub identifiers: Option<DeviceResponseIdentifiers>,
    #[serde(default)]
    pub versions: Option<DeviceResponseVersions>,
    #[serde(default)]
    pub features: Option<BTreeMap<String, bool>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceResponseIdentifiers {
    pub long: String,
    pub short: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceResponseVersions {
    pub api: String,
    pub app: String,
}

impl Envelope for DeviceResponse {
    fn check_encodable(&self) -> Result<(), CodecError> {
        ensure_finite("uptime", self.uptime)
    }
}

impl From<DeviceResponse> for DeviceStatus {
    fn from(response: DeviceResponse) -> Self {
        Self {
            name: response.name,
            uptime: response.uptime,
            identifiers: response.identifiers.map(|i| DeviceIdentifiers {
                long: i.long,
                short: i.short,
            }),
            versions: response.versions.map(|v| DeviceVersions {
                api: v.api,
                app: v.app,
            }),
            features: response.features.unwrap_or_default(),
        }
    }
}

impl From<&DeviceStatus> for DeviceResponse {
    fn from(status: &DeviceStatus) -> Self {
        Self {
            name: status.name.clone(),
            uptime: status.uptime,
            identifiers: status
                .identifiers
                .as_ref()
                .map(|i| DeviceResponseIdentifiers {
                    long: i.long.clone(),
                    short: i.short.clone(),
                }),
            versions: status.versions.as_ref().map(|v| DeviceResponseVersions {
                api: v.api.clone(),
                app: v.app.clone(),
            }),
            features: Some(status.features.clone()),
        }
    }
}

// =============================================================================
// Battery, Wi-Fi and Health
// =============================================================================

/// `GET /v1/device/battery`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryResponse {
    pub value: i64,
    pub unit: String,
}

impl Envelope for BatteryResponse {}

impl From<BatteryResponse> for BatteryStatus {
    fn from(response: BatteryResponse) -> Self {
        Self {
            value: response.value,
            unit: response.unit,
        }
    }
}

impl From<&BatteryStatus> for BatteryResponse {
    fn from(status: &BatteryStatus) -> Self {
        Self {
            value: status.value,
            unit: status.unit.clone(),
        }
    }
}

/// One element of the `GET /v1/device/wifi` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WifiNetworkItem {
    pub ssid: String,
    pub rssi: f64,
    pub encrypted: bool,
}

impl Envelope for WifiNetworkItem {
    fn check_encodable(&self) -> Result<(), CodecError> {
        ensure_finite("rssi", self.rssi)
    }
}

impl From<WifiNetworkItem> for WifiNetwork {
    fn from(item: WifiNetworkItem) -> Self {
        Self {
            ssid: item.ssid,
            rssi: item.rssi,
            encrypted: item.encrypted,
        }
    }
}

impl From<&WifiNetwork> for WifiNetworkItem {
    fn from(network: &WifiNetwork) -> Self {
        Self {
            ssid: network.ssid.clone(),
            rssi: network.rssi,
            encrypted: network.encrypted,
        }
    }
}

/// `GET /v1/healthz`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthzResponse {
    pub healthy: bool,
}

impl Envelope for HealthzResponse {}

impl From<HealthzResponse> for HealthStatus {
    fn from(response: HealthzResponse) -> Self {
        Self {
            healthy: response.healthy,
        }
    }
}

/// `GET /v1/readyz`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyzResponse {
    pub ready: bool,
}

impl Envelope for ReadyzResponse {}

impl From<ReadyzResponse> for ReadyStatus {
    fn from(response: ReadyzResponse) -> Self {
        Self {
            ready: response.ready,
        }
    }
}

// =============================================================================
// Movement
// =============================================================================

/// `GET /v1/movement/lock`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementLockResponse {
    pub locked: bool,
}

impl Envelope for MovementLockResponse {}

impl From<MovementLockResponse> for MovementLockStatus {
    fn from(response: MovementLockResponse) -> Self {
        Self {
            locked: response.locked,
        }
    }
}

/// `POST /v1/movement` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementRequest {
    pub name: String,
    pub persist: bool,
    pub steps: Vec<MovementStepItem>,
}

/// One step of a movement request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementStepItem {
    pub angle: i64,
    pub direction: Direction,
    pub distance: f64,
}

impl MovementRequest {
    /// Translate a declared plan into the wire request.
    ///
    /// Steps are converted one by one, in order. A step whose direction is
    /// not a known [`Direction`] fails the whole conversion.
    pub fn from_plan(plan: &MovementPlan) -> Result<Self, CodecError> {
        let steps = plan
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let direction = step
                    .direction()
                    .map_err(|source| CodecError::InvalidStep { index, source })?;
                Ok(MovementStepItem {
                    angle: step.angle,
                    direction,
                    distance: step.distance,
                })
            })
            .collect::<Result<Vec<_>, CodecError>>()?;

        Ok(Self {
            name: plan.name.clone(),
            persist: plan.persist,
            steps,
        })
    }

    /// Translate the wire request back into a plan
    pub fn into_plan(self) -> MovementPlan {
        MovementPlan {
            name: self.name,
            persist: self.persist,
            steps: self
                .steps
                .into_iter()
                .map(|item| Step::new(item.angle, item.direction.as_str(), item.distance))
                .collect(),
        }
    }
}

impl Envelope for MovementRequest {
    fn check_encodable(&self) -> Result<(), CodecError> {
        self.steps
            .iter()
            .enumerate()
            .try_for_each(|(index, step)| {
                ensure_finite(format!("steps[{}].distance", index), step.distance)
            })
    }
}

/// Response of every `/v1/movement` call
///
/// The device does not echo the installed plan; it only reports whether it
/// is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementResponse {
    pub moving: bool,
}

impl Envelope for MovementResponse {}

// =============================================================================
// Errors
// =============================================================================

/// Error body the device sends with failed requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: i32,
}

impl Envelope for ErrorResponse {}
