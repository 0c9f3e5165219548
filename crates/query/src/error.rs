//! Error types for bridge operations.
//!
//! All errors surfaced by the query bridge are represented by the
//! [`Error`] enum. These errors are:
//! - **Structured**: Each variant has typed fields for error details
//! - **Serializable**: Can be converted to/from JSON
//! - **Lossless**: Store-client errors convert in without losing their
//!   message

use serde::{Deserialize, Serialize};

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Query bridge errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Usage | `MissingKind`, `IdFieldForbidden`, `IncompleteKey`, `DistinctRequiresColumns` | Builder misconfigured for the operation |
/// | Translation | `UnsupportedFilter`, `InvalidOperator` | Accumulated state has no native form |
/// | Validation | `InvalidKey`, `LimitExceeded` | Store rejected the input shape |
/// | System | `Serialization`, `Store` | Infrastructure errors |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Usage ====================
    /// Operation needs a kind and none was set on the builder
    #[error("{operation} requires a kind")]
    MissingKind {
        /// Operation that needed the kind
        operation: String,
    },

    /// Row carries a reserved id field the operation cannot accept
    #[error("{operation} does not accept an id field in the row")]
    IdFieldForbidden {
        /// Operation that rejected the row
        operation: String,
    },

    /// Operation needs a complete key
    #[error("{operation} requires a complete key")]
    IncompleteKey {
        /// Operation that needed the key
        operation: String,
    },

    /// Distinct-on-projection set without any projected columns
    #[error("distinct requires projected columns")]
    DistinctRequiresColumns,

    // ==================== Translation ====================
    /// Accumulated filter kind has no native query form
    #[error("unsupported filter kind: {kind}")]
    UnsupportedFilter {
        /// Name of the offending filter kind
        kind: String,
    },

    /// Filter operator token was not recognized
    #[error("invalid operator: {token:?}")]
    InvalidOperator {
        /// The unrecognized token
        token: String,
    },

    // ==================== Validation ====================
    /// Key failed structural validation
    #[error("invalid key: {reason}")]
    InvalidKey {
        /// Validation failure description
        reason: String,
    },

    /// A store limit was exceeded
    #[error("limit exceeded: {reason}")]
    LimitExceeded {
        /// Limit violation description
        reason: String,
    },

    // ==================== System ====================
    /// Entity encode or decode failed
    #[error("serialization error: {reason}")]
    Serialization {
        /// Encode or decode failure description
        reason: String,
    },

    /// Store-side failure
    #[error("store error: {message}")]
    Store {
        /// Message carried over from the store client
        message: String,
    },
}

impl Error {
    /// Missing-kind error for a named operation
    pub fn missing_kind(operation: &str) -> Self {
        Error::MissingKind {
            operation: operation.to_string(),
        }
    }

    /// Forbidden-id-field error for a named operation
    pub fn id_field_forbidden(operation: &str) -> Self {
        Error::IdFieldForbidden {
            operation: operation.to_string(),
        }
    }

    /// Incomplete-key error for a named operation
    pub fn incomplete_key(operation: &str) -> Self {
        Error::IncompleteKey {
            operation: operation.to_string(),
        }
    }
}

impl From<kindling_core::Error> for Error {
    fn from(err: kindling_core::Error) -> Self {
        match err {
            kindling_core::Error::InvalidKey(e) => Error::InvalidKey {
                reason: e.to_string(),
            },
            kindling_core::Error::LimitExceeded(e) => Error::LimitExceeded {
                reason: e.to_string(),
            },
            kindling_core::Error::InvalidOperator(token) => Error::InvalidOperator { token },
            kindling_core::Error::Serialization(reason) => Error::Serialization { reason },
            kindling_core::Error::Store(message) => Error::Store { message },
        }
    }
}
