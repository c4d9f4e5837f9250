//! Entry point shared by every resource and probe

use std::sync::Arc;

use pathfinder_client::Transport;
use tracing::info;

use crate::config::{ProviderConfig, Result};
use crate::movement::MovementResource;
use crate::probe::{
    BatteryProbe, DeviceProbe, HealthProbe, MovementLockProbe, Probe, ReadyProbe, WifiProbe,
};

/// One configured device connection
///
/// Built once from configuration and then shared read-only; every resource
/// and probe handed out holds the same transport.
#[derive(Clone)]
pub struct Provider {
    transport: Arc<dyn Transport>,
}

impl Provider {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Build the HTTP transport described by `config`
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let client = config.build_client()?;
        info!(
            address = %client.base_url(),
            authenticated = config.api_key.is_some(),
            "Provider configured"
        );
        Ok(Self::new(Arc::new(client)))
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    pub fn movement(&self) -> MovementResource {
        MovementResource::new(self.transport())
    }

    pub fn device(&self) -> DeviceProbe {
        Probe::new(self.transport())
    }

    pub fn battery(&self) -> BatteryProbe {
        Probe::new(self.transport())
    }

    pub fn wifi(&self) -> WifiProbe {
        Probe::new(self.transport())
    }

    pub fn health(&self) -> HealthProbe {
        Probe::new(self.transport())
    }

    pub fn ready(&self) -> ReadyProbe {
        Probe::new(self.transport())
    }

    pub fn movement_lock(&self) -> MovementLockProbe {
        Probe::new(self.transport())
    }
}
