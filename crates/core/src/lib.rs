//! Core types for kindling
//!
//! This crate defines the data model shared by store clients and the query
//! bridge:
//! - Value: unified enum for all property values
//! - Key / KeyId / PathElement: entity identity, with ancestor paths
//! - Fields / Entity: insertion-ordered field maps and stored records
//! - StoreQuery / PropertyFilter / PropertyOrder: the assembled native query
//! - Limits: size caps enforced on write paths
//! - Error: error type hierarchy
//!
//! Nothing in this crate talks to a store. It is pure model code so that
//! clients and the bridge can agree on shapes without depending on each
//! other.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod entity;
pub mod error;
pub mod key;
pub mod limits;
pub mod query;
pub mod timestamp;
pub mod value;

// Re-export commonly used types at the crate root
pub use entity::{Entity, Fields};
pub use error::{Error, Result};
pub use key::{validate_key, Key, KeyError, KeyId, PathElement};
pub use limits::{LimitError, Limits};
pub use query::{
    Operator, OrderDirection, PropertyFilter, PropertyOrder, StoreQuery, KEY_PSEUDO_COLUMN,
};
pub use timestamp::Timestamp;
pub use value::Value;
