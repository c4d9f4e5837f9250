//! pathfinder-mock - Simulated Pathfinder rover
//!
//! Serves the rover control API from in-memory state:
//! - read-only status snapshots taken from [`MockConfig`]
//! - a single movement plan that `POST /v1/movement` installs and
//!   `DELETE /v1/movement` removes; the movement lock is held while one is
//!   installed
//! - optional bearer key authentication
//! - request counting and fault injection for tests
//!
//! # Usage
//!
//! ```ignore
//! use pathfinder_mock::{create_router, DeviceState, MockConfig};
//!
//! let state = DeviceState::new(MockConfig::default());
//! let router = create_router(state.clone());
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

pub use config::{MockConfig, MockConfigError};
pub use error::ApiError;
pub use state::{DeviceState, Fault};

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Create the device API router with the given state
pub fn create_router(state: DeviceState) -> Router {
    Router::new()
        .route("/v1/device/status", get(handlers::device_status))
        .route("/v1/device/battery", get(handlers::battery))
        .route("/v1/device/wifi", get(handlers::wifi))
        .route("/v1/healthz", get(handlers::healthz))
        .route("/v1/readyz", get(handlers::readyz))
        .route(
            "/v1/movement",
            get(handlers::get_movement)
                .post(handlers::create_movement)
                .delete(handlers::delete_movement),
        )
        .route("/v1/movement/lock", get(handlers::movement_lock))
        // The last layer added runs first: count and inject faults, then authenticate
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::fault_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
