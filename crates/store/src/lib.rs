//! Store clients for kindling
//!
//! This crate defines the client seam the query bridge talks through:
//! - StoreClient: object-safe trait covering lookup, query, and mutation
//! - MemoryStore: embedded backend with DashMap kind tables
//! - Query evaluation (filter, order, distinct, projection) for the
//!   embedded backend
//!
//! The bridge never touches a backend directly. Everything flows through
//! `dyn StoreClient`, so a remote client can stand in for the embedded
//! store without the bridge noticing.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
mod eval;
pub mod memory;

pub use client::StoreClient;
pub use memory::MemoryStore;
