//! Error types for Pathfinder client operations

use thiserror::Error;

use crate::codec::CodecError;

/// Result type alias for Pathfinder client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to the device
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Credential cannot be sent as a header value
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    /// Timeout
    #[error("Request timed out")]
    Timeout,

    /// Connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Payload could not be encoded or decoded
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl ClientError {
    /// Classify a reqwest failure by what went wrong on the wire
    pub(crate) fn from_send(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::ConnectionFailed(error.to_string())
        } else {
            Self::HttpError(error)
        }
    }
}
