//! Shared state for the simulated device

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use pathfinder_core::{BatteryStatus, DeviceStatus, MovementPlan, WifiNetwork};

use crate::config::MockConfig;

/// Failure injected into every subsequent request until cleared
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Answer with this HTTP status and an error envelope
    Status(u16),
    /// Answer 200 with a body that is not JSON
    Garbage,
}

struct Inner {
    device: DeviceStatus,
    battery: BatteryStatus,
    wifi: Vec<WifiNetwork>,
    healthy: bool,
    ready: bool,
    plan: Option<MovementPlan>,
    fault: Option<Fault>,
    requests: u64,
}

/// Application state shared across all handlers
///
/// Clones share the same device.
#[derive(Clone)]
pub struct DeviceState {
    inner: Arc<Mutex<Inner>>,
    api_key: Option<Arc<str>>,
    started: Instant,
}

impl DeviceState {
    pub fn new(config: MockConfig) -> Self {
        let inner = Inner {
            device: config.device_status(),
            battery: config.battery_status(),
            wifi: config.wifi_networks(),
            healthy: config.healthy,
            ready: config.ready,
            plan: None,
            fault: None,
            requests: 0,
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
            api_key: config.api_key.map(Arc::from),
            started: Instant::now(),
        }
    }

    pub(crate) fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    pub fn device(&self) -> DeviceStatus {
        let mut device = self.inner.lock().device.clone();
        device.uptime = self.started.elapsed().as_secs_f64();
        device
    }

    pub fn battery(&self) -> BatteryStatus {
        self.inner.lock().battery.clone()
    }

    pub fn set_battery(&self, value: i64) {
        self.inner.lock().battery.value = value;
    }

    pub fn wifi(&self) -> Vec<WifiNetwork> {
        self.inner.lock().wifi.clone()
    }

    pub fn healthy(&self) -> bool {
        self.inner.lock().healthy
    }

    pub fn ready(&self) -> bool {
        self.inner.lock().ready
    }

    pub fn set_ready(&self, ready: bool) {
        self.inner.lock().ready = ready;
    }

    // =========================================================================
    // Movement
    // =========================================================================

    /// Currently installed plan
    pub fn plan(&self) -> Option<MovementPlan> {
        self.inner.lock().plan.clone()
    }

    /// Install `plan`, replacing any previous one
    pub fn install(&self, plan: MovementPlan) {
        self.inner.lock().plan = Some(plan);
    }

    /// Remove the installed plan, returning it
    pub fn remove(&self) -> Option<MovementPlan> {
        self.inner.lock().plan.take()
    }

    /// The rover moves while a plan is installed
    pub fn moving(&self) -> bool {
        self.inner.lock().plan.is_some()
    }

    /// New movement is refused while a plan is installed
    pub fn locked(&self) -> bool {
        self.moving()
    }

    // =========================================================================
    // Test hooks
    // =========================================================================

    pub fn inject(&self, fault: Fault) {
        self.inner.lock().fault = Some(fault);
    }

    pub fn clear_fault(&self) {
        self.inner.lock().fault = None;
    }

    pub(crate) fn fault(&self) -> Option<Fault> {
        self.inner.lock().fault.clone()
    }

    /// Count one received request
    pub(crate) fn record_request(&self) {
        self.inner.lock().requests += 1;
    }

    /// Requests received so far, including rejected ones
    pub fn request_count(&self) -> u64 {
        self.inner.lock().requests
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new(MockConfig::default())
    }
}
