//! Diagnostic translation
//!
//! Maps transport errors, unexpected statuses and codec failures onto the
//! diagnostic kinds the host understands. Nothing here downgrades a failure;
//! every function returns an error diagnostic.

use pathfinder_client::{ClientError, CodecError, Method, RawResponse};
use pathfinder_core::{Diagnostic, DiagnosticKind};

/// Lifecycle phase a diagnostic was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Delete,
    /// Read-only status probe
    Probe,
}

impl Action {
    /// Headline used for every diagnostic raised in this phase
    pub fn summary(&self) -> &'static str {
        match self {
            Action::Create => "Unable to Create Resource",
            Action::Read => "Unable to Refresh Resource",
            Action::Delete => "Unable to Delete Resource",
            Action::Probe => "Unable to Read Data Source",
        }
    }
}

/// Translate a failed send.
///
/// Codec errors keep their own kind; everything else is `transport`.
pub fn client_error(action: Action, error: &ClientError) -> Diagnostic {
    match error {
        ClientError::Codec(codec) => codec_error(action, codec),
        other => Diagnostic::new(
            DiagnosticKind::Transport,
            action.summary(),
            format!(
                "An unexpected error occurred while communicating with the device. \
                 Please retry the operation.\n\nHTTP Error: {}",
                other
            ),
        ),
    }
}

/// Translate a codec failure into `encode` or `decode`
pub fn codec_error(action: Action, error: &CodecError) -> Diagnostic {
    if error.is_encode() {
        Diagnostic::new(
            DiagnosticKind::Encode,
            action.summary(),
            format!(
                "An unexpected error occurred while encoding the request. \
                 No request was sent.\n\n{}",
                error
            ),
        )
    } else {
        Diagnostic::new(
            DiagnosticKind::Decode,
            action.summary(),
            format!(
                "An unexpected error occurred while parsing the device response.\n\n{}",
                error
            ),
        )
    }
}

/// Translate a non-success, non-404 response
pub fn unexpected_status(
    action: Action,
    method: &Method,
    path: &str,
    response: &RawResponse,
) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind::UnexpectedStatus,
        action.summary(),
        format!(
            "The device answered {} {} with HTTP {}: {}",
            method,
            path,
            response.status.as_u16(),
            response.error_message()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathfinder_client::{codec, MovementResponse, StatusCode};

    #[test]
    fn test_transport_errors() {
        let diagnostic = client_error(Action::Read, &ClientError::Timeout);
        assert_eq!(diagnostic.kind, DiagnosticKind::Transport);
        assert_eq!(diagnostic.summary, "Unable to Refresh Resource");
        assert!(diagnostic.detail.contains("Request timed out"));

        let diagnostic = client_error(
            Action::Delete,
            &ClientError::ConnectionFailed("connection refused".into()),
        );
        assert_eq!(diagnostic.kind, DiagnosticKind::Transport);
        assert!(diagnostic.detail.contains("connection refused"));
    }

    #[test]
    fn test_codec_errors_keep_their_kind() {
        let decode_err = codec::decode::<MovementResponse>(b"{").unwrap_err();
        let diagnostic = client_error(Action::Probe, &ClientError::Codec(decode_err));
        assert_eq!(diagnostic.kind, DiagnosticKind::Decode);
        assert!(diagnostic.detail.contains("JSON decode error"));

        let encode_err = CodecError::NonFinite {
            field: "steps[0].distance".into(),
            value: f64::INFINITY,
        };
        let diagnostic = codec_error(Action::Create, &encode_err);
        assert_eq!(diagnostic.kind, DiagnosticKind::Encode);
        assert!(diagnostic.detail.contains("steps[0].distance"));
    }

    #[test]
    fn test_unexpected_status_carries_device_message() {
        let response = RawResponse::new(
            StatusCode::CONFLICT,
            r#"{"message":"movement locked","status":409}"#,
        );
        let diagnostic = unexpected_status(Action::Create, &Method::POST, "/v1/movement", &response);
        assert_eq!(diagnostic.kind, DiagnosticKind::UnexpectedStatus);
        assert_eq!(
            diagnostic.detail,
            "The device answered POST /v1/movement with HTTP 409: movement locked"
        );
    }
}
