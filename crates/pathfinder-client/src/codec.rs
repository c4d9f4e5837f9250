//! Typed envelope codec
//!
//! Converts between wire JSON and the typed records in [`crate::types`].
//! Encoding is checked before anything is sent: `serde_json` writes non-finite
//! floats as `null`, so those are rejected here instead of being substituted.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::trace;

use pathfinder_core::CoreError;

/// Codec failures
#[derive(Debug, Error)]
pub enum CodecError {
    /// Value could not be serialized
    #[error("JSON encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Float field holds NaN or an infinity
    #[error("JSON encode error: {field} is not a finite number ({value})")]
    NonFinite { field: String, value: f64 },

    /// Declared step cannot be expressed on the wire
    #[error("JSON encode error: steps[{index}]: {source}")]
    InvalidStep {
        index: usize,
        #[source]
        source: CoreError,
    },

    /// Body is not valid JSON for the expected shape
    #[error("JSON decode error: {0}")]
    Decode(#[source] serde_json::Error),
}

impl CodecError {
    /// True for failures raised before a request was sent
    pub fn is_encode(&self) -> bool {
        !matches!(self, CodecError::Decode(_))
    }
}

/// A request or response body of the control API
pub trait Envelope: Serialize + DeserializeOwned {
    /// Reject values that JSON cannot represent faithfully
    fn check_encodable(&self) -> Result<(), CodecError> {
        Ok(())
    }
}

impl<T: Envelope> Envelope for Vec<T> {
    fn check_encodable(&self) -> Result<(), CodecError> {
        self.iter().try_for_each(Envelope::check_encodable)
    }
}

/// Serialize an envelope to JSON bytes
pub fn encode<T: Envelope>(value: &T) -> Result<Vec<u8>, CodecError> {
    value.check_encodable()?;
    let bytes = serde_json::to_vec(value).map_err(CodecError::Encode)?;
    trace!(bytes = bytes.len(), "Encoded envelope");
    Ok(bytes)
}

/// Parse JSON bytes into an envelope
///
/// Partial results are never returned; any missing required field or
/// malformed input fails the whole decode.
pub fn decode<T: Envelope>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}

/// Fail if `value` is NaN or infinite
pub(crate) fn ensure_finite(field: impl Into<String>, value: f64) -> Result<(), CodecError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CodecError::NonFinite {
            field: field.into(),
            value,
        })
    }
}
