//! Client abstraction over a kind/key entity store
//!
//! This module defines the StoreClient trait that the query bridge is
//! written against. Swapping the embedded MemoryStore for a remote
//! client must not require touching any bridge code.

use kindling_core::{Entity, Key, Result, StoreQuery};

/// Client seam for a schema-less kind/key entity store
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync). Implementations take `&self`
/// and manage their own interior synchronization.
pub trait StoreClient: Send + Sync {
    /// Fetch one entity by key
    ///
    /// Returns `None` if nothing is stored under the key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is structurally invalid or the fetch
    /// fails.
    fn lookup(&self, key: &Key) -> Result<Option<Entity>>;

    /// Execute an assembled query and return matching entities
    ///
    /// Results honor the query's filters, orders, distinct properties,
    /// offset, limit, projection, and keys-only flag. Order among
    /// entities the query does not order is implementation-defined but
    /// stable for a given store state.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be executed.
    fn run_query(&self, query: &StoreQuery) -> Result<Vec<Entity>>;

    /// Store a new entity, failing if one already exists under its key
    ///
    /// Incomplete keys get a store-assigned numeric id. Returns the
    /// final key, complete in either case.
    ///
    /// # Errors
    ///
    /// Returns an error on key validation failure, limit violation, or
    /// if the key is already taken.
    fn insert(&self, entity: Entity) -> Result<Key>;

    /// Store a batch of new entities
    ///
    /// Returns the final keys in input order. Not atomic: a failure
    /// partway leaves earlier entities stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch exceeds the mutation limit or any
    /// single insert fails.
    fn insert_batch(&self, entities: Vec<Entity>) -> Result<Vec<Key>>;

    /// Store an entity, replacing any existing one under the same key
    ///
    /// The key must be complete. Returns the key back.
    ///
    /// # Errors
    ///
    /// Returns an error on key validation failure or limit violation.
    fn upsert(&self, entity: Entity) -> Result<Key>;

    /// Delete entities by key, returning how many existed
    ///
    /// Keys with nothing stored under them are skipped, not errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch exceeds the mutation limit or any
    /// key is structurally invalid.
    fn delete_batch(&self, keys: Vec<Key>) -> Result<u64>;
}
