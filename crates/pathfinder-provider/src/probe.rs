//! Read-only status probes
//!
//! Every probe issues one `GET`, decodes one envelope and maps it into the
//! caller's result shape. The six device probes differ only in path and
//! shape, so they are instances of one generic [`Probe`].

use std::marker::PhantomData;
use std::sync::Arc;

use pathfinder_client::{
    endpoints, BatteryResponse, DeviceResponse, Envelope, HealthzResponse, Method,
    MovementLockResponse, ReadyzResponse, Transport, WifiNetworkItem,
};
use pathfinder_core::{
    BatteryStatus, DeviceStatus, HealthStatus, MovementLockStatus, ReadyStatus, Response,
    WifiNetworks,
};
use tracing::{debug, instrument};

use crate::diagnostics::Action;
use crate::exchange::{exchange, Reply};

/// Static description of one probe endpoint
pub trait ProbeEndpoint: 'static {
    /// Name used in logs and by the host
    const NAME: &'static str;
    /// Path relative to the base address
    const PATH: &'static str;
    /// Wire envelope returned by the device
    type Wire: Envelope;
    /// Result shape handed back to the caller
    type Model;

    fn into_model(wire: Self::Wire) -> Self::Model;
}

/// Generic read-only probe
pub struct Probe<E> {
    transport: Arc<dyn Transport>,
    _endpoint: PhantomData<fn() -> E>,
}

impl<E> Clone for Probe<E> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            _endpoint: PhantomData,
        }
    }
}

impl<E: ProbeEndpoint> Probe<E> {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            _endpoint: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        E::NAME
    }

    /// Refresh the probe result.
    ///
    /// `prior` is the result tracked from the previous read, if any. It is
    /// returned untouched when the read fails, and dropped when the device
    /// answers 404.
    #[instrument(skip_all, fields(probe = E::NAME))]
    pub async fn read(&self, prior: Option<E::Model>) -> Response<E::Model> {
        debug!("Reading {}", E::PATH);

        match exchange::<E::Wire>(
            self.transport.as_ref(),
            Action::Probe,
            Method::GET,
            E::PATH,
            None,
        )
        .await
        {
            Ok(Reply::Decoded(wire)) => Response::tracked(E::into_model(wire)),
            Ok(Reply::Absent) => Response::removed(),
            Err(diagnostic) => Response::failed(prior, diagnostic),
        }
    }
}

// =============================================================================
// Endpoints
// =============================================================================

/// `GET /v1/device/status`
pub struct Device;

impl ProbeEndpoint for Device {
    const NAME: &'static str = "device";
    const PATH: &'static str = endpoints::DEVICE_STATUS;
    type Wire = DeviceResponse;
    type Model = DeviceStatus;

    fn into_model(wire: DeviceResponse) -> DeviceStatus {
        wire.into()
    }
}

/// `GET /v1/device/battery`
pub struct Battery;

impl ProbeEndpoint for Battery {
    const NAME: &'static str = "battery";
    const PATH: &'static str = endpoints::BATTERY;
    type Wire = BatteryResponse;
    type Model = BatteryStatus;

    fn into_model(wire: BatteryResponse) -> BatteryStatus {
        wire.into()
    }
}

/// `GET /v1/device/wifi`
pub struct Wifi;

impl ProbeEndpoint for Wifi {
    const NAME: &'static str = "wifi_networks";
    const PATH: &'static str = endpoints::WIFI;
    type Wire = Vec<WifiNetworkItem>;
    type Model = WifiNetworks;

    fn into_model(wire: Vec<WifiNetworkItem>) -> WifiNetworks {
        WifiNetworks {
            networks: wire.into_iter().map(Into::into).collect(),
        }
    }
}

/// `GET /v1/healthz`
pub struct Health;

impl ProbeEndpoint for Health {
    const NAME: &'static str = "health";
    const PATH: &'static str = endpoints::HEALTH;
    type Wire = HealthzResponse;
    type Model = HealthStatus;

    fn into_model(wire: HealthzResponse) -> HealthStatus {
        wire.into()
    }
}

/// `GET /v1/readyz`
pub struct Ready;

impl ProbeEndpoint for Ready {
    const NAME: &'static str = "ready";
    const PATH: &'static str = endpoints::READY;
    type Wire = ReadyzResponse;
    type Model = ReadyStatus;

    fn into_model(wire: ReadyzResponse) -> ReadyStatus {
        wire.into()
    }
}

/// `GET /v1/movement/lock`
pub struct MovementLock;

impl ProbeEndpoint for MovementLock {
    const NAME: &'static str = "movement_lock";
    const PATH: &'static str = endpoints::MOVEMENT_LOCK;
    type Wire = MovementLockResponse;
    type Model = MovementLockStatus;

    fn into_model(wire: MovementLockResponse) -> MovementLockStatus {
        wire.into()
    }
}

pub type DeviceProbe = Probe<Device>;
pub type BatteryProbe = Probe<Battery>;
pub type WifiProbe = Probe<Wifi>;
pub type HealthProbe = Probe<Health>;
pub type ReadyProbe = Probe<Ready>;
pub type MovementLockProbe = Probe<MovementLock>;
