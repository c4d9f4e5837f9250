//! Transport abstraction shared by every probe and the movement reconciler

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Method, StatusCode};

use crate::codec::{self, CodecError, Envelope};
use crate::error::Result;
use crate::types::ErrorResponse;

/// Raw outcome of one HTTP round trip
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as `T`
    pub fn decode<T: Envelope>(&self) -> std::result::Result<T, CodecError> {
        codec::decode(&self.body)
    }

    /// Best-effort description of a failed response.
    ///
    /// Uses the device's error envelope when the body carries one, the raw
    /// body text when it is short, and the bare status otherwise.
    pub fn error_message(&self) -> String {
        if let Ok(err) = self.decode::<ErrorResponse>() {
            if !err.message.is_empty() {
                return err.message;
            }
        }
        match std::str::from_utf8(&self.body) {
            Ok(text) if !text.trim().is_empty() && text.len() <= 512 => text.trim().to_string(),
            _ => format!("HTTP {}", self.status),
        }
    }
}

/// Sends one request and returns the raw response
///
/// Implementations perform exactly one round trip per call and never retry.
/// Dropping the returned future cancels the request in flight.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `body` (or an empty body) to `path`, relative to the base address
    async fn send(&self, method: Method, path: &str, body: Option<Vec<u8>>)
        -> Result<RawResponse>;
}
