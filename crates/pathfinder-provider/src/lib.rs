//! pathfinder-provider - Declarative lifecycle for the Pathfinder rover
//!
//! The host supplies decoded configuration values and keeps the tracked state
//! between calls; this crate turns each lifecycle call into exactly one round
//! trip against the device and reports the outcome as a [`Response`].
//!
//! - [`MovementResource`] owns create/read/update/delete of the movement plan.
//! - [`Probe`] is the read-only template behind the six status probes.
//! - [`diagnostics`] maps transport and codec failures onto diagnostic kinds.
//!
//! # Usage
//!
//! ```ignore
//! use pathfinder_provider::{Provider, ProviderConfig};
//! use pathfinder_core::{MovementPlan, Step};
//!
//! let provider = Provider::from_config(&ProviderConfig::new("http://rover.local:8080"))?;
//!
//! let plan = MovementPlan::new("example").with_step(Step::new(0, "forward", 1.0));
//! let created = provider.movement().create(plan).await;
//! let battery = provider.battery().read(None).await;
//! ```
//!
//! [`Response`]: pathfinder_core::Response

pub mod config;
pub mod diagnostics;
mod exchange;
pub mod movement;
pub mod planner;
pub mod probe;
mod provider;

pub use config::{ConfigError, ProviderConfig, Result};
pub use movement::MovementResource;
pub use planner::{plan_change, Change};
pub use probe::{
    BatteryProbe, DeviceProbe, HealthProbe, MovementLockProbe, Probe, ProbeEndpoint, ReadyProbe,
    WifiProbe,
};
pub use provider::Provider;
