//! Fluent query bridge over kind/key document stores
//!
//! This crate translates a fluent builder (select / filter / order /
//! limit / offset / distinct / keys-only) into [`StoreQuery`] values a
//! [`StoreClient`](kindling_store::StoreClient) can run, and shapes the
//! entities that come back into plain rows.
//!
//! ## Design
//!
//! - [`Builder`] is the single entry point: fluent setters accumulate
//!   [`QueryState`], terminal operations translate and execute it.
//! - The client and the row processor are injected; any
//!   `StoreClient` implementation works, [`EntityProcessor`] is the
//!   default row shape.
//! - Read results are memoized per builder, scoped by operation family
//!   and requested column set. A repeated read with the same columns is
//!   served from the cache without touching the client.
//! - Filters the native query cannot express fail translation with
//!   [`Error::UnsupportedFilter`] instead of being silently dropped.
//!
//! ```ignore
//! use kindling_query::{Builder, Operator, Value};
//! use kindling_store::MemoryStore;
//! use std::sync::Arc;
//!
//! let client = Arc::new(MemoryStore::new());
//! let mut builder = Builder::new(client)
//!     .kind("Task")
//!     .filter("priority", Operator::Ge, 4_i64)
//!     .order_by_desc("priority")
//!     .limit(10);
//!
//! let rows = builder.get()?;
//! let titles = builder.pluck("title")?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
mod assemble;
pub mod builder;
mod cache;
mod delete;
pub mod error;
pub mod processor;
mod read;
pub mod state;
mod translate;
mod write;

#[cfg(test)]
mod tests;

// Re-export the bridge surface at the crate root
pub use builder::{BeforeQueryHook, Builder};
pub use error::{Error, Result};
pub use processor::{EntityProcessor, ResultProcessor, Row, Rows};
pub use state::{DistinctMode, Filter, Ident, KeyTarget, OrderClause, QueryState, ALL_COLUMNS};
pub use write::ID_FIELD;

// Re-export the shared model so callers need only this crate
pub use kindling_core::{
    validate_key, Entity, Fields, Key, KeyError, KeyId, LimitError, Limits, Operator,
    OrderDirection, PathElement, PropertyFilter, PropertyOrder, StoreQuery, Timestamp, Value,
    KEY_PSEUDO_COLUMN,
};
