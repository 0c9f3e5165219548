//! Shared error type for the model layer
//!
//! One flat enum covers everything the model layer and store clients can
//! reject. `thiserror` derives `Display` and `Error`; key and limit
//! violations convert in via `#[from]`.

use crate::key::KeyError;
use crate::limits::LimitError;
use thiserror::Error;

/// Result type alias for model-layer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the model layer and store clients
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Key failed structural validation
    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),

    /// A configured limit was exceeded
    #[error("limit exceeded: {0}")]
    LimitExceeded(#[from] LimitError),

    /// Filter operator token was not recognized
    #[error("invalid operator: {0:?}")]
    InvalidOperator(String),

    /// Entity encode or decode failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Store-side failure
    #[error("store error: {0}")]
    Store(String),
}

impl Error {
    /// Build a serialization error from any displayable cause
    pub fn serialization(cause: impl std::fmt::Display) -> Self {
        Error::Serialization(cause.to_string())
    }

    /// Build a store error from any displayable cause
    pub fn store(cause: impl std::fmt::Display) -> Self {
        Error::Store(cause.to_string())
    }
}
