//! Shared test utilities for the integration suites.
//!
//! Import via `mod common;` from any test binary.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use kindling::{Builder, Entity, Fields, Key, MemoryStore, StoreClient, Value};
use tracing_subscriber::filter::LevelFilter;

// ============================================================================
// Initialization
// ============================================================================

static INIT: Once = Once::new();

/// Install a debug-level subscriber once per test binary.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(LevelFilter::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// TestStore - in-memory store plus builder factory
// ============================================================================

pub struct TestStore {
    pub client: Arc<MemoryStore>,
}

impl TestStore {
    pub fn new() -> Self {
        init_tracing();
        TestStore {
            client: Arc::new(MemoryStore::new()),
        }
    }

    pub fn with_store(store: MemoryStore) -> Self {
        init_tracing();
        TestStore {
            client: Arc::new(store),
        }
    }

    /// Fresh builder over the shared store.
    pub fn builder(&self) -> Builder {
        Builder::new(self.client.clone())
    }

    /// Fresh builder with the kind already set.
    pub fn kind(&self, kind: &str) -> Builder {
        self.builder().kind(kind)
    }

    /// Store an entity directly, bypassing the bridge.
    pub fn seed(&self, key: Key, fields: Fields) {
        self.client
            .upsert(Entity::new(key, fields))
            .expect("seed entity");
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Field map from name/value pairs.
pub fn fields(pairs: Vec<(&str, Value)>) -> Fields {
    pairs.into_iter().collect()
}

/// Seed a small book catalog under named keys.
pub fn seed_books(store: &TestStore) {
    for (name, title, author, year, copies) in [
        ("dune", "Dune", "Herbert", 1965_i64, 3_i64),
        ("left-hand", "The Left Hand of Darkness", "Le Guin", 1969, 2),
        ("dispossessed", "The Dispossessed", "Le Guin", 1974, 1),
        ("neuromancer", "Neuromancer", "Gibson", 1984, 4),
    ] {
        store.seed(
            Key::named("Book", name),
            fields(vec![
                ("title", Value::from(title)),
                ("author", Value::from(author)),
                ("year", Value::Int(year)),
                ("copies", Value::Int(copies)),
            ]),
        );
    }
}

/// Titles of a processed result set, in order.
pub fn titles(rows: &[Fields]) -> Vec<String> {
    rows.iter()
        .map(|row| match row.get("title") {
            Some(Value::String(title)) => title.clone(),
            other => panic!("row without string title: {other:?}"),
        })
        .collect()
}
