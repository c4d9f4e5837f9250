//! Data models shared by the client, the provider and the device simulator

pub mod movement;
pub mod status;

pub use movement::{Direction, MovementPlan, Step, DISTANCE_RANGE, MAX_STEPS};
pub use status::{
    BatteryStatus, DeviceIdentifiers, DeviceStatus, DeviceVersions, HealthStatus,
    MovementLockStatus, ReadyStatus, WifiNetwork, WifiNetworks,
};
