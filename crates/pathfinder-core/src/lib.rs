//! pathfinder-core - Core types for the Pathfinder rover
//!
//! This crate holds the values that flow between the declarative host and the
//! device: the tracked [`MovementPlan`], the read-only status snapshots, and the
//! [`Response`] type every lifecycle operation returns. It performs no I/O.

pub mod diagnostics;
pub mod error;
pub mod models;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Response};
pub use error::{CoreError, CoreResult};
pub use models::*;
