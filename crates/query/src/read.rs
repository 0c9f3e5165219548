//! Read-side terminal operations
//!
//! ## Contract
//!
//! | Operation | Input | Output |
//! |-----------|-------|--------|
//! | `lookup` / `lookup_columns` | key | `Option<Row>` |
//! | `find` / `find_columns` | raw identifier | `Option<Row>` |
//! | `get` / `get_columns` | accumulated state | `Rows` |
//! | `first` | accumulated state | `Option<Row>` |
//! | `pluck` / `pluck_keyed` | column names | values / pairs |
//! | `get_keys` | accumulated state | `Vec<Key>` |
//!
//! Requested columns merge into the builder's projection and the merge
//! persists across calls. Results are memoized per operation scope and
//! requested column set; a repeat request is served from the builder's
//! cache without calling the client.

use kindling_core::{Key, Value, KEY_PSEUDO_COLUMN};
use tracing::debug;

use crate::assemble;
use crate::builder::Builder;
use crate::cache::ResultCache;
use crate::error::Result;
use crate::processor::{Row, Rows};
use crate::state::{Ident, ALL_COLUMNS};

const LOOKUP_SCOPE: &str = "lookup";
const QUERY_SCOPE: &str = "query";

impl Builder {
    /// Fetch one row by key
    ///
    /// A miss is `Ok(None)`, not an error.
    pub fn lookup(&mut self, key: &Key) -> Result<Option<Row>> {
        self.lookup_columns::<&str>(key, &[])
    }

    /// Fetch one row by key, requesting columns
    ///
    /// If a projection remains after the merge, the processed row is
    /// narrowed to exactly those fields; the `__key__` pseudo-column
    /// survives only when requested.
    pub fn lookup_columns<S: AsRef<str>>(&mut self, key: &Key, columns: &[S]) -> Result<Option<Row>> {
        let fingerprint = ResultCache::fingerprint(LOOKUP_SCOPE, columns);
        if let Some(rows) = self.cache.get(fingerprint) {
            return Ok(rows.into_iter().next());
        }

        assemble::resolve_projection(&mut self.state, columns);
        let found = self.client.lookup(key)?;
        let row = found.map(|entity| {
            let row = self.processor.process_single(&self.state, entity);
            if self.state.columns.is_empty() {
                row
            } else {
                row.only(&self.state.columns)
            }
        });

        self.cache.put(fingerprint, row.clone().into_iter().collect());
        Ok(row)
    }

    /// Fetch one row by raw identifier against the kind
    ///
    /// The identifier resolves to a *named* key (numeric identifiers
    /// become their decimal string).
    pub fn find(&mut self, ident: impl Into<Ident>) -> Result<Option<Row>> {
        self.find_columns::<_, &str>(ident, &[])
    }

    /// Fetch one row by raw identifier, requesting columns
    pub fn find_columns<I, S>(&mut self, ident: I, columns: &[S]) -> Result<Option<Row>>
    where
        I: Into<Ident>,
        S: AsRef<str>,
    {
        let kind = self.require_kind("find")?.to_string();
        let key = Key::named(kind, ident.into().as_name());
        self.lookup_columns(&key, columns)
    }

    /// Run the accumulated query, returning processed rows
    pub fn get(&mut self) -> Result<Rows> {
        self.get_columns(&[ALL_COLUMNS])
    }

    /// Run the accumulated query, requesting columns
    pub fn get_columns<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<Rows> {
        let fingerprint = ResultCache::fingerprint(QUERY_SCOPE, columns);
        if let Some(rows) = self.cache.get(fingerprint) {
            return Ok(rows);
        }

        assemble::resolve_projection(&mut self.state, columns);
        let query = assemble::assemble(&self.state)?;
        let entities = self.client.run_query(&query)?;
        debug!(target: "kindling::query", rows = entities.len(), "query returned");
        let rows = self.processor.process_results(&self.state, entities);
        self.cache.put(fingerprint, rows.clone());
        Ok(rows)
    }

    /// First row of the accumulated query
    ///
    /// Persists `limit(1)` on the state.
    pub fn first(&mut self) -> Result<Option<Row>> {
        self.state.limit = Some(1);
        let rows = self.get()?;
        Ok(rows.into_iter().next())
    }

    /// Values of one column across the result set
    ///
    /// The access strategy (direct field vs dot-path into nested
    /// objects) is chosen once from the first row; result sets are
    /// assumed homogeneous. A row missing the column yields `Null`.
    pub fn pluck(&mut self, column: &str) -> Result<Vec<Value>> {
        let rows = self.get_columns(&[column])?;
        let accessor = ColumnAccessor::choose(rows.first(), column);
        Ok(rows.iter().map(|row| accessor.value(row)).collect())
    }

    /// Column values keyed by another column
    ///
    /// Duplicate keys keep their first position and take the last
    /// value, in result order.
    pub fn pluck_keyed(&mut self, column: &str, key_column: &str) -> Result<Vec<(Value, Value)>> {
        let rows = self.get_columns(&[column, key_column])?;
        let value_accessor = ColumnAccessor::choose(rows.first(), column);
        let key_accessor = ColumnAccessor::choose(rows.first(), key_column);

        let mut pairs: Vec<(Value, Value)> = Vec::new();
        for row in &rows {
            let entry_key = key_accessor.value(row);
            let entry_value = value_accessor.value(row);
            match pairs.iter_mut().find(|(k, _)| *k == entry_key) {
                Some(slot) => slot.1 = entry_value,
                None => pairs.push((entry_key, entry_value)),
            }
        }
        Ok(pairs)
    }

    /// Keys of every row the accumulated query matches
    ///
    /// Persists the keys-only flag on the state.
    pub fn get_keys(&mut self) -> Result<Vec<Key>> {
        self.state.keys_only = true;
        let rows = self.get()?;
        Ok(extract_keys(&rows))
    }
}

/// Pull `__key__` values out of processed rows
///
/// Rows without the pseudo-column (a processor that drops it, or a
/// narrowed lookup row) are skipped.
pub(crate) fn extract_keys(rows: &[Row]) -> Vec<Key> {
    rows.iter()
        .filter_map(|row| match row.get(KEY_PSEUDO_COLUMN) {
            Some(Value::Key(key)) => Some(key.clone()),
            _ => None,
        })
        .collect()
}

/// Column access strategy for `pluck`, chosen once per call
enum ColumnAccessor {
    Direct(String),
    Path(Vec<String>),
}

impl ColumnAccessor {
    fn choose(first: Option<&Row>, column: &str) -> Self {
        if let Some(row) = first {
            if row.get(column).is_none() && column.contains('.') {
                return ColumnAccessor::Path(column.split('.').map(str::to_string).collect());
            }
        }
        ColumnAccessor::Direct(column.to_string())
    }

    fn value(&self, row: &Row) -> Value {
        match self {
            ColumnAccessor::Direct(column) => row.get(column).cloned().unwrap_or(Value::Null),
            ColumnAccessor::Path(segments) => {
                let mut segments = segments.iter();
                let Some(first) = segments.next() else {
                    return Value::Null;
                };
                let Some(mut current) = row.get(first) else {
                    return Value::Null;
                };
                for segment in segments {
                    match current.as_object().and_then(|object| object.get(segment)) {
                        Some(value) => current = value,
                        None => return Value::Null,
                    }
                }
                current.clone()
            }
        }
    }
}
