//! Operational limits enforced at the store boundary
//!
//! ## Contract
//!
//! | Limit | Default | Enforced by |
//! |-------|---------|-------------|
//! | `max_key_name_bytes` | 1500 | [`validate_key`](crate::validate_key) |
//! | `max_batch_mutations` | 500 | batch insert / batch delete |
//! | `max_entity_bytes` | 1 MiB | entity encode on write |
//!
//! Limits travel with the client that enforces them, so an embedded store
//! and a remote one can disagree without either lying.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Limit violations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LimitError {
    /// A single batch carried more mutations than the store accepts
    #[error("batch of {actual} mutations exceeds limit of {max}")]
    BatchTooLarge {
        /// Mutations in the offending batch
        actual: usize,
        /// Configured maximum
        max: usize,
    },

    /// An encoded entity was larger than the store accepts
    #[error("entity of {actual} bytes exceeds limit of {max}")]
    EntityTooLarge {
        /// Encoded size of the offending entity
        actual: usize,
        /// Configured maximum
        max: usize,
    },
}

/// Store-side size limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum UTF-8 length of a key name
    pub max_key_name_bytes: usize,
    /// Maximum mutations accepted in one batch
    pub max_batch_mutations: usize,
    /// Maximum encoded size of one entity
    pub max_entity_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_key_name_bytes: 1500,
            max_batch_mutations: 500,
            max_entity_bytes: 1024 * 1024,
        }
    }
}

impl Limits {
    /// Deliberately tight limits for exercising failure paths in tests
    pub fn with_small_limits() -> Self {
        Limits {
            max_key_name_bytes: 20,
            max_batch_mutations: 4,
            max_entity_bytes: 256,
        }
    }

    /// Check a batch size against `max_batch_mutations`
    pub fn validate_batch_len(&self, len: usize) -> Result<(), LimitError> {
        if len > self.max_batch_mutations {
            return Err(LimitError::BatchTooLarge {
                actual: len,
                max: self.max_batch_mutations,
            });
        }
        Ok(())
    }

    /// Check an encoded entity size against `max_entity_bytes`
    pub fn validate_entity_bytes(&self, len: usize) -> Result<(), LimitError> {
        if len > self.max_entity_bytes {
            return Err(LimitError::EntityTooLarge {
                actual: len,
                max: self.max_entity_bytes,
            });
        }
        Ok(())
    }
}
