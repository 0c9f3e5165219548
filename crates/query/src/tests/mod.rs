//! Test modules for the query crate.
//!
//! [`CountingClient`] wraps a [`MemoryStore`] and counts calls per
//! method family, so tests can pin exactly when the builder reaches
//! the store and when the memo cache answers instead.


use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use kindling_core::{Entity, Fields, Key, Result as CoreResult, StoreQuery, Value};
use kindling_store::{MemoryStore, StoreClient};

use crate::builder::Builder;

/// Store client decorator that counts calls per method family.
pub struct CountingClient {
    store: MemoryStore,
    lookups: AtomicU32,
    queries: AtomicU32,
    mutations: AtomicU32,
}

impl CountingClient {
    pub fn new() -> Self {
        CountingClient {
            store: MemoryStore::new(),
            lookups: AtomicU32::new(0),
            queries: AtomicU32::new(0),
            mutations: AtomicU32::new(0),
        }
    }

    /// Store an entity directly, bypassing the counters.
    pub fn seed(&self, entity: Entity) {
        self.store.upsert(entity).unwrap();
    }

    pub fn lookup_count(&self) -> u32 {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn query_count(&self) -> u32 {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn mutation_count(&self) -> u32 {
        self.mutations.load(Ordering::SeqCst)
    }
}

impl StoreClient for CountingClient {
    fn lookup(&self, key: &Key) -> CoreResult<Option<Entity>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.store.lookup(key)
    }

    fn run_query(&self, query: &StoreQuery) -> CoreResult<Vec<Entity>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.store.run_query(query)
    }

    fn insert(&self, entity: Entity) -> CoreResult<Key> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.store.insert(entity)
    }

    fn insert_batch(&self, entities: Vec<Entity>) -> CoreResult<Vec<Key>> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.store.insert_batch(entities)
    }

    fn upsert(&self, entity: Entity) -> CoreResult<Key> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.store.upsert(entity)
    }

    fn delete_batch(&self, keys: Vec<Key>) -> CoreResult<u64> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.store.delete_batch(keys)
    }
}

/// Build a field map from name/value pairs.
pub fn row(pairs: Vec<(&str, Value)>) -> Fields {
    pairs.into_iter().collect()
}

/// Client seeded with three Task entities under named keys a, b, c.
pub fn seeded_tasks() -> Arc<CountingClient> {
    let client = Arc::new(CountingClient::new());
    for (name, title, priority, done) in [
        ("a", "write draft", 3_i64, false),
        ("b", "review draft", 5, false),
        ("c", "ship", 9, true),
    ] {
        client.seed(Entity::new(
            Key::named("Task", name),
            row(vec![
                ("title", Value::from(title)),
                ("priority", Value::Int(priority)),
                ("done", Value::Bool(done)),
            ]),
        ));
    }
    client
}

/// Builder over the client, kind already set to Task.
pub fn task_builder(client: &Arc<CountingClient>) -> Builder {
    Builder::new(client.clone()).kind("Task")
}
