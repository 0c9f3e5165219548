//! Write-side terminal operations
//!
//! ## Contract
//!
//! | Operation | Key derivation | Result |
//! |-----------|----------------|--------|
//! | `insert` / `insert_many` | `id` field when present, else allocated | `bool` |
//! | `insert_get_id` | always allocated; `id` field rejected | identifier |
//! | `upsert` | caller-supplied complete key | identifier |
//!
//! Every operation requires a kind on the builder. An `id` field in a
//! row is consumed into the key (rendered as a string name) and never
//! stored as data. Batch rows are field-sorted before the key is
//! derived so the payload shape does not depend on construction order;
//! single rows keep their field order.

use kindling_core::{Entity, Fields, Key, Value};
use tracing::debug;

use crate::builder::Builder;
use crate::error::{Error, Result};

/// Row field consumed into the entity key on insert
pub const ID_FIELD: &str = "id";

impl Builder {
    /// Insert one row
    ///
    /// An empty row is a no-op that still reports success.
    pub fn insert(&mut self, row: Fields) -> Result<bool> {
        let rows = if row.is_empty() { Vec::new() } else { vec![row] };
        self.insert_rows(rows, false)
    }

    /// Insert a batch of rows
    pub fn insert_many(&mut self, rows: Vec<Fields>) -> Result<bool> {
        self.insert_rows(rows, true)
    }

    fn insert_rows(&mut self, rows: Vec<Fields>, sort: bool) -> Result<bool> {
        let kind = self.require_kind("insert")?.to_string();
        if rows.is_empty() {
            return Ok(true);
        }
        self.apply_before_query_hooks();

        let mut entities = Vec::with_capacity(rows.len());
        for mut row in rows {
            if sort {
                row.sort_by_name();
            }
            let key = match row.remove(ID_FIELD) {
                Some(id) => Key::named(&kind, render_id(&id)),
                None => Key::incomplete(&kind),
            };
            entities.push(Entity::new(key, row));
        }

        let keys = self.client.insert_batch(entities)?;
        debug!(target: "kindling::query", kind = %kind, inserted = keys.len(), "insert committed");
        Ok(true)
    }

    /// Insert one row, returning the stored identifier
    ///
    /// The key is always store-allocated, so a row carrying an `id`
    /// field is rejected rather than silently renamed.
    pub fn insert_get_id(&mut self, row: Fields) -> Result<String> {
        let kind = self.require_kind("insertGetId")?.to_string();
        if row.contains(ID_FIELD) {
            return Err(Error::id_field_forbidden("insertGetId"));
        }

        let key = self.client.insert(Entity::new(Key::incomplete(&kind), row))?;
        debug!(target: "kindling::query", kind = %kind, key = %key, "insert committed");
        key.path_end_identifier().ok_or_else(|| Error::Store {
            message: "insert returned incomplete key".to_string(),
        })
    }

    /// Insert or replace one row under a caller-supplied key
    ///
    /// An empty row is a no-op (`Ok(None)`). Any `id` field is
    /// stripped; the key decides identity here.
    pub fn upsert(&mut self, mut row: Fields, key: Key) -> Result<Option<String>> {
        self.require_kind("upsert")?;
        if row.is_empty() {
            return Ok(None);
        }
        row.remove(ID_FIELD);
        if !key.is_complete() {
            return Err(Error::incomplete_key("upsert"));
        }

        let key = self.client.upsert(Entity::new(key, row))?;
        debug!(target: "kindling::query", key = %key, "upsert committed");
        let identifier = key.path_end_identifier().ok_or_else(|| Error::Store {
            message: "upsert returned incomplete key".to_string(),
        })?;
        Ok(Some(identifier))
    }
}

/// Render an `id` field value as a key name
fn render_id(id: &Value) -> String {
    match id {
        Value::String(name) => name.clone(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Bool(b) => b.to_string(),
        other => format!("{other:?}"),
    }
}
