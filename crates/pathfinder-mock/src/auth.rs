//! Request middleware
//!
//! Bearer token authentication plus the request counter and fault injection
//! used by tests. Health and readiness probes skip authentication, like the
//! real device.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::state::{DeviceState, Fault};

const UNAUTHENTICATED_PATHS: [&str; 2] = ["/v1/healthz", "/v1/readyz"];

/// Check `Authorization: Bearer <key>` when the device has a key configured.
pub async fn auth_middleware(
    State(state): State<DeviceState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.api_key() else {
        return Ok(next.run(request).await);
    };

    if UNAUTHENTICATED_PATHS.contains(&request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match provided {
        Some(token) if token == expected => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!("Invalid bearer token");
            Err(ApiError::Unauthorized("invalid API key".to_string()))
        }
        None => {
            tracing::warn!(
                path = %request.uri().path(),
                "Missing or malformed Authorization header"
            );
            Err(ApiError::Unauthorized("missing API key".to_string()))
        }
    }
}

/// Count every request and answer with the injected fault, if any.
pub async fn fault_middleware(
    State(state): State<DeviceState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    state.record_request();

    match state.fault() {
        None => next.run(request).await,
        Some(Fault::Status(code)) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            ApiError::Injected(status).into_response()
        }
        Some(Fault::Garbage) => {
            (StatusCode::OK, [(CONTENT_TYPE, "application/json")], "<<not json>>").into_response()
        }
    }
}
