//! HTTP request handlers for the simulated device

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pathfinder_client::{
    BatteryResponse, DeviceResponse, HealthzResponse, MovementLockResponse, MovementResponse,
    ReadyzResponse, WifiNetworkItem,
};
use pathfinder_core::MovementPlan;
use tracing::info;

use crate::error::ApiError;
use crate::state::DeviceState;

// =============================================================================
// Status
// =============================================================================

/// GET /v1/device/status
pub async fn device_status(State(state): State<DeviceState>) -> Json<DeviceResponse> {
    Json(DeviceResponse::from(&state.device()))
}

/// GET /v1/device/battery
pub async fn battery(State(state): State<DeviceState>) -> Json<BatteryResponse> {
    Json(BatteryResponse::from(&state.battery()))
}

/// GET /v1/device/wifi
pub async fn wifi(State(state): State<DeviceState>) -> Json<Vec<WifiNetworkItem>> {
    Json(state.wifi().iter().map(WifiNetworkItem::from).collect())
}

/// GET /v1/healthz
pub async fn healthz(State(state): State<DeviceState>) -> Json<HealthzResponse> {
    Json(HealthzResponse {
        healthy: state.healthy(),
    })
}

/// GET /v1/readyz
pub async fn readyz(State(state): State<DeviceState>) -> Json<ReadyzResponse> {
    Json(ReadyzResponse {
        ready: state.ready(),
    })
}

/// GET /v1/movement/lock
pub async fn movement_lock(State(state): State<DeviceState>) -> Json<MovementLockResponse> {
    Json(MovementLockResponse {
        locked: state.locked(),
    })
}

// =============================================================================
// Movement
// =============================================================================

/// POST /v1/movement
///
/// Installs the submitted plan and starts moving. The body is decoded by
/// hand so malformed requests get the device's error envelope instead of the
/// framework's rejection text.
pub async fn create_movement(
    State(state): State<DeviceState>,
    body: Bytes,
) -> Result<(StatusCode, Json<MovementResponse>), ApiError> {
    let plan: MovementPlan = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid movement request: {}", e)))?;

    if let Some(issue) = plan.validate().iter().next() {
        let message = match &issue.attribute {
            Some(attribute) => format!("{}: {}", attribute, issue.detail),
            None => issue.detail.clone(),
        };
        return Err(ApiError::BadRequest(message));
    }

    info!(plan = %plan.name, steps = plan.steps.len(), persist = plan.persist, "Movement plan installed");
    state.install(plan);

    Ok((StatusCode::CREATED, Json(MovementResponse { moving: true })))
}

/// GET /v1/movement
pub async fn get_movement(
    State(state): State<DeviceState>,
) -> Result<Json<MovementResponse>, ApiError> {
    if state.plan().is_none() {
        return Err(ApiError::NotFound("no movement plan".to_string()));
    }
    Ok(Json(MovementResponse {
        moving: state.moving(),
    }))
}

/// DELETE /v1/movement
pub async fn delete_movement(
    State(state): State<DeviceState>,
) -> Result<Json<MovementResponse>, ApiError> {
    let removed = state
        .remove()
        .ok_or_else(|| ApiError::NotFound("no movement plan".to_string()))?;

    info!(plan = %removed.name, "Movement plan removed");
    Ok(Json(MovementResponse { moving: false }))
}
