//! Kindling - fluent query bridge for kind/key document stores
//!
//! Kindling translates a fluent builder (select, filter, order, limit,
//! offset, distinct, keys-only) into native queries against a
//! schema-less kind/key store, and shapes the entities that come back
//! into plain field-map rows.
//!
//! # Quick Start
//!
//! ```ignore
//! use kindling::{Builder, MemoryStore, Operator, Value};
//! use std::sync::Arc;
//!
//! let client = Arc::new(MemoryStore::new());
//!
//! // Write a row; the id field becomes the entity key
//! Builder::new(client.clone())
//!     .kind("Task")
//!     .insert(vec![("id", Value::from("t1")), ("title", Value::from("ship it"))]
//!         .into_iter()
//!         .collect())?;
//!
//! // Query it back
//! let mut tasks = Builder::new(client)
//!     .kind("Task")
//!     .filter("title", Operator::Eq, "ship it")
//!     .limit(10);
//! let rows = tasks.get()?;
//! ```
//!
//! # Architecture
//!
//! The [`Builder`] accumulates query state and hands translation and
//! execution to an injected [`StoreClient`]. [`MemoryStore`] is the
//! bundled client; any store with lookup/run-query/mutate semantics
//! can slot in behind the same trait.

// Re-export the bridge API plus the bundled store client
pub use kindling_query::*;
pub use kindling_store::{MemoryStore, StoreClient};
