//! Embedded in-memory store
//!
//! # Design
//!
//! - DashMap of kind tables: readers never block each other
//! - BTreeMap per kind, keyed by full key: scans are key-ordered, so
//!   unordered query results are deterministic
//! - Entities encoded with MessagePack at write time: reads decode an
//!   owned copy, writers can never alias a reader's view
//! - AtomicI64 id allocator, shared across kinds, starting at 1
//!
//! Limits are enforced here, not in the bridge, because they belong to
//! whichever store a client fronts.

use std::collections::btree_map::Entry as TableEntry;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;
use kindling_core::{validate_key, Entity, Error, Key, Limits, Result, StoreQuery};
use tracing::{debug, info};

use crate::client::StoreClient;
use crate::eval;

/// Embedded store backed by per-kind ordered tables
#[derive(Debug)]
pub struct MemoryStore {
    kinds: DashMap<String, BTreeMap<Key, Vec<u8>>>,
    next_id: AtomicI64,
    limits: Limits,
}

impl MemoryStore {
    /// Open an empty store with default limits
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Open an empty store with explicit limits
    pub fn with_limits(limits: Limits) -> Self {
        info!(target: "kindling::store", "memory store opened");
        MemoryStore {
            kinds: DashMap::new(),
            next_id: AtomicI64::new(1),
            limits,
        }
    }

    /// Number of entities stored under a kind
    pub fn count(&self, kind: &str) -> usize {
        self.kinds.get(kind).map(|table| table.len()).unwrap_or(0)
    }

    /// Limits this store enforces
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn complete_key(&self, key: Key) -> Key {
        if key.is_complete() {
            key
        } else {
            key.with_assigned_id(self.allocate_id())
        }
    }

    fn prepare(&self, entity: &Entity) -> Result<Vec<u8>> {
        validate_key(&entity.key, &self.limits)?;
        let encoded = rmp_serde::to_vec(&entity.fields).map_err(Error::serialization)?;
        self.limits.validate_entity_bytes(encoded.len())?;
        Ok(encoded)
    }

    fn decode(&self, key: &Key, encoded: &[u8]) -> Result<Entity> {
        let fields = rmp_serde::from_slice(encoded).map_err(Error::serialization)?;
        Ok(Entity::new(key.clone(), fields))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreClient for MemoryStore {
    fn lookup(&self, key: &Key) -> Result<Option<Entity>> {
        validate_key(key, &self.limits)?;
        let Some(table) = self.kinds.get(key.kind()) else {
            return Ok(None);
        };
        let Some(encoded) = table.get(key) else {
            return Ok(None);
        };
        Ok(Some(self.decode(key, encoded)?))
    }

    fn run_query(&self, query: &StoreQuery) -> Result<Vec<Entity>> {
        let mut matched = Vec::new();
        if let Some(table) = self.kinds.get(&query.kind) {
            for (key, encoded) in table.iter() {
                let entity = self.decode(key, encoded)?;
                if eval::matches_filters(&entity, &query.filters) {
                    matched.push(entity);
                }
            }
        }

        eval::sort_entities(&mut matched, &query.orders);
        let mut results = eval::dedupe_on(matched, &query.distinct_on);

        if let Some(offset) = query.offset {
            let skip = (offset as usize).min(results.len());
            results.drain(..skip);
        }
        if let Some(limit) = query.limit {
            results.truncate(limit as usize);
        }

        let results: Vec<Entity> = results
            .into_iter()
            .map(|entity| eval::project_entity(entity, query))
            .collect();
        debug!(
            target: "kindling::store",
            kind = %query.kind,
            results = results.len(),
            "query executed"
        );
        Ok(results)
    }

    fn insert(&self, entity: Entity) -> Result<Key> {
        let entity = Entity::new(self.complete_key(entity.key), entity.fields);
        let encoded = self.prepare(&entity)?;
        let mut table = self.kinds.entry(entity.key.kind().to_string()).or_default();
        match table.entry(entity.key.clone()) {
            TableEntry::Occupied(_) => Err(Error::store(format!(
                "entity already exists: {}",
                entity.key
            ))),
            TableEntry::Vacant(slot) => {
                slot.insert(encoded);
                Ok(entity.key)
            }
        }
    }

    fn insert_batch(&self, entities: Vec<Entity>) -> Result<Vec<Key>> {
        self.limits.validate_batch_len(entities.len())?;
        let mut keys = Vec::with_capacity(entities.len());
        for entity in entities {
            keys.push(self.insert(entity)?);
        }
        debug!(target: "kindling::store", count = keys.len(), "batch insert applied");
        Ok(keys)
    }

    fn upsert(&self, entity: Entity) -> Result<Key> {
        let entity = Entity::new(self.complete_key(entity.key), entity.fields);
        let encoded = self.prepare(&entity)?;
        self.kinds
            .entry(entity.key.kind().to_string())
            .or_default()
            .insert(entity.key.clone(), encoded);
        Ok(entity.key)
    }

    fn delete_batch(&self, keys: Vec<Key>) -> Result<u64> {
        self.limits.validate_batch_len(keys.len())?;
        let mut deleted = 0u64;
        for key in keys {
            validate_key(&key, &self.limits)?;
            if let Some(mut table) = self.kinds.get_mut(key.kind()) {
                if table.remove(&key).is_some() {
                    deleted += 1;
                }
            }
        }
        debug!(target: "kindling::store", deleted, "batch delete applied");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindling_core::{Fields, KeyId, LimitError, Operator, PropertyFilter, PropertyOrder, Value};

    fn fields(pairs: Vec<(&str, Value)>) -> Fields {
        pairs.into_iter().collect()
    }

    fn task(name: &str, priority: i64) -> Entity {
        Entity::new(
            Key::named("Task", name),
            fields(vec![
                ("title", Value::from(format!("task {name}"))),
                ("priority", Value::Int(priority)),
            ]),
        )
    }

    // ====================================================================
    // Insert and lookup
    // ====================================================================

    #[test]
    fn test_insert_then_lookup_roundtrip() {
        let store = MemoryStore::new();
        let key = store.insert(task("a", 1)).unwrap();
        assert_eq!(key, Key::named("Task", "a"));

        let found = store.lookup(&key).unwrap().unwrap();
        assert_eq!(found.key, key);
        assert_eq!(found.fields.get("priority"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_lookup_missing_returns_none() {
        let store = MemoryStore::new();
        assert_eq!(store.lookup(&Key::named("Task", "nope")).unwrap(), None);
    }

    #[test]
    fn test_insert_incomplete_key_allocates_sequential_ids() {
        let store = MemoryStore::new();
        let first = store
            .insert(Entity::new(Key::incomplete("Task"), Fields::new()))
            .unwrap();
        let second = store
            .insert(Entity::new(Key::incomplete("Task"), Fields::new()))
            .unwrap();
        assert_eq!(first.id(), Some(&KeyId::Id(1)));
        assert_eq!(second.id(), Some(&KeyId::Id(2)));
    }

    #[test]
    fn test_insert_conflict_fails() {
        let store = MemoryStore::new();
        store.insert(task("a", 1)).unwrap();
        let err = store.insert(task("a", 2)).unwrap_err();
        assert!(matches!(err, Error::Store(_)));
        // Original entity untouched.
        let found = store.lookup(&Key::named("Task", "a")).unwrap().unwrap();
        assert_eq!(found.fields.get("priority"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_insert_ancestor_path_key() {
        let store = MemoryStore::new();
        let key = Key::named("Customer", "acme").child_with_id("Order", 7);
        store
            .insert(Entity::new(key.clone(), Fields::new()))
            .unwrap();
        assert!(store.lookup(&key).unwrap().is_some());
        assert_eq!(store.count("Order"), 1);
        assert_eq!(store.count("Customer"), 0);
    }

    #[test]
    fn test_insert_rejects_invalid_key() {
        let store = MemoryStore::new();
        let err = store
            .insert(Entity::new(Key::named("Task", ""), Fields::new()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    // ====================================================================
    // Upsert
    // ====================================================================

    #[test]
    fn test_upsert_replaces_existing() {
        let store = MemoryStore::new();
        store.insert(task("a", 1)).unwrap();
        store.upsert(task("a", 9)).unwrap();
        let found = store.lookup(&Key::named("Task", "a")).unwrap().unwrap();
        assert_eq!(found.fields.get("priority"), Some(&Value::Int(9)));
        assert_eq!(store.count("Task"), 1);
    }

    #[test]
    fn test_upsert_incomplete_key_allocates() {
        let store = MemoryStore::new();
        let key = store
            .upsert(Entity::new(Key::incomplete("Task"), Fields::new()))
            .unwrap();
        assert!(key.is_complete());
    }

    // ====================================================================
    // Delete
    // ====================================================================

    #[test]
    fn test_delete_batch_counts_existing_only() {
        let store = MemoryStore::new();
        store.insert(task("a", 1)).unwrap();
        store.insert(task("b", 2)).unwrap();
        let deleted = store
            .delete_batch(vec![
                Key::named("Task", "a"),
                Key::named("Task", "missing"),
                Key::named("Task", "b"),
            ])
            .unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.count("Task"), 0);
    }

    // ====================================================================
    // Queries
    // ====================================================================

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        for (name, priority) in [("a", 3), ("b", 1), ("c", 2), ("d", 1)] {
            store.insert(task(name, priority)).unwrap();
        }
        store
    }

    #[test]
    fn test_query_filters_and_orders() {
        let store = seeded_store();
        let mut query = StoreQuery::new("Task");
        query.filters = vec![PropertyFilter {
            property: "priority".to_string(),
            op: Operator::Le,
            value: Value::Int(2),
        }];
        query.orders = vec![PropertyOrder {
            property: "priority".to_string(),
            direction: kindling_core::OrderDirection::Descending,
        }];

        let results = store.run_query(&query).unwrap();
        let names: Vec<String> = results
            .iter()
            .map(|e| e.key.path_end_identifier().unwrap())
            .collect();
        // priority 2 first, then the two priority-1 rows in key order.
        assert_eq!(names, vec!["c", "b", "d"]);
    }

    #[test]
    fn test_query_offset_and_limit() {
        let store = seeded_store();
        let mut query = StoreQuery::new("Task");
        query.offset = Some(1);
        query.limit = Some(2);
        let results = store.run_query(&query).unwrap();
        let names: Vec<String> = results
            .iter()
            .map(|e| e.key.path_end_identifier().unwrap())
            .collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_query_offset_past_end() {
        let store = seeded_store();
        let mut query = StoreQuery::new("Task");
        query.offset = Some(100);
        assert!(store.run_query(&query).unwrap().is_empty());
    }

    #[test]
    fn test_query_keys_only_strips_fields() {
        let store = seeded_store();
        let mut query = StoreQuery::new("Task");
        query.keys_only = true;
        let results = store.run_query(&query).unwrap();
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|e| e.fields.is_empty()));
        assert!(results.iter().all(|e| e.key.is_complete()));
    }

    #[test]
    fn test_query_distinct_on_property() {
        let store = seeded_store();
        let mut query = StoreQuery::new("Task");
        query.distinct_on = vec!["priority".to_string()];
        query.orders = vec![PropertyOrder {
            property: "priority".to_string(),
            direction: kindling_core::OrderDirection::Ascending,
        }];
        let results = store.run_query(&query).unwrap();
        let priorities: Vec<&Value> = results
            .iter()
            .map(|e| e.fields.get("priority").unwrap())
            .collect();
        assert_eq!(
            priorities,
            vec![&Value::Int(1), &Value::Int(2), &Value::Int(3)]
        );
    }

    #[test]
    fn test_query_projection_narrows_fields() {
        let store = seeded_store();
        let mut query = StoreQuery::new("Task");
        query.projection = vec!["priority".to_string()];
        let results = store.run_query(&query).unwrap();
        assert!(results.iter().all(|e| e.fields.len() == 1));
        assert!(results.iter().all(|e| e.fields.contains("priority")));
    }

    #[test]
    fn test_query_unknown_kind_is_empty() {
        let store = seeded_store();
        let query = StoreQuery::new("Ghost");
        assert!(store.run_query(&query).unwrap().is_empty());
    }

    #[test]
    fn test_query_order_independent_of_insert_order() {
        use rand::seq::SliceRandom;

        let mut names: Vec<u32> = (0..20).collect();
        names.shuffle(&mut rand::thread_rng());

        let store = MemoryStore::new();
        for n in &names {
            store
                .insert(Entity::new(
                    Key::named("Item", format!("item-{n:02}")),
                    fields(vec![("n", Value::Int(*n as i64))]),
                ))
                .unwrap();
        }

        let mut query = StoreQuery::new("Item");
        query.orders = vec![PropertyOrder {
            property: "n".to_string(),
            direction: kindling_core::OrderDirection::Ascending,
        }];
        let results = store.run_query(&query).unwrap();
        let got: Vec<i64> = results
            .iter()
            .map(|e| e.fields.get("n").unwrap().as_int().unwrap())
            .collect();
        let want: Vec<i64> = (0..20).collect();
        assert_eq!(got, want);
    }

    // ====================================================================
    // Limits
    // ====================================================================

    #[test]
    fn test_batch_insert_over_limit() {
        let store = MemoryStore::with_limits(Limits::with_small_limits());
        let batch: Vec<Entity> = (0..5)
            .map(|n| Entity::new(Key::named("Task", format!("t{n}")), Fields::new()))
            .collect();
        let err = store.insert_batch(batch).unwrap_err();
        assert_eq!(
            err,
            Error::LimitExceeded(LimitError::BatchTooLarge { actual: 5, max: 4 })
        );
    }

    #[test]
    fn test_entity_too_large_rejected() {
        let store = MemoryStore::with_limits(Limits::with_small_limits());
        let big = "x".repeat(400);
        let err = store
            .insert(Entity::new(
                Key::named("Task", "big"),
                fields(vec![("blob", Value::from(big))]),
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::LimitExceeded(LimitError::EntityTooLarge { .. })
        ));
    }

    #[test]
    fn test_key_name_over_limit_rejected() {
        let store = MemoryStore::with_limits(Limits::with_small_limits());
        let err = store
            .insert(Entity::new(
                Key::named("Task", "name-way-over-twenty-bytes"),
                Fields::new(),
            ))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    #[test]
    fn test_delete_batch_over_limit() {
        let store = MemoryStore::with_limits(Limits::with_small_limits());
        let keys: Vec<Key> = (0..5).map(|n| Key::with_id("Task", n)).collect();
        assert!(store.delete_batch(keys).is_err());
    }
}
