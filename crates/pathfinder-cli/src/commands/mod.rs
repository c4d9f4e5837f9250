//! Command implementations for the pathfinder CLI
//!
//! Every command returns the diagnostics the provider raised; `main` prints
//! them and sets the exit status.

pub mod movement;
pub mod probes;

pub use movement::{apply, destroy, plan, refresh};
pub use probes::{battery, device, health, lock, ready, wifi};
