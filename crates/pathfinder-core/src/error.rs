//! Error types for core value parsing

use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while interpreting declared values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Direction string is not one of the supported values
    #[error("unknown direction {0:?}, expected one of: forward, backward")]
    UnknownDirection(String),
}
