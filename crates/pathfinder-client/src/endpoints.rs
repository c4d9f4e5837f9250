//! Paths of the device control API, relative to the configured base address

pub const DEVICE_STATUS: &str = "/v1/device/status";
pub const BATTERY: &str = "/v1/device/battery";
pub const WIFI: &str = "/v1/device/wifi";
pub const HEALTH: &str = "/v1/healthz";
pub const READY: &str = "/v1/readyz";
pub const MOVEMENT: &str = "/v1/movement";
pub const MOVEMENT_LOCK: &str = "/v1/movement/lock";
