//! API error types and conversions

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pathfinder_client::ErrorResponse;

/// API error type that converts to the device's `{message, status}` envelope
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 401 Unauthorized
    Unauthorized(String),
    /// 404 Not Found
    NotFound(String),
    /// Any status forced by fault injection
    Injected(StatusCode),
}

impl ApiError {
    fn parts(self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Injected(status) => (
                status,
                status
                    .canonical_reason()
                    .unwrap_or("injected failure")
                    .to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %message, "API error");
        } else {
            tracing::debug!(status = status.as_u16(), %message, "API client error");
        }

        let body = Json(ErrorResponse {
            message,
            status: i32::from(status.as_u16()),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_parts() {
        let (status, message) = ApiError::NotFound("no movement plan".into()).parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "no movement plan");

        let (status, message) = ApiError::Injected(StatusCode::SERVICE_UNAVAILABLE).parts();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(message, "Service Unavailable");
    }
}
