//! Per-builder result memoization
//!
//! Processed rows are memoized under a fingerprint of the *requested*
//! per-call column sequence, not the merged builder state. A repeat of
//! the same request returns the cached rows without touching the
//! client. The cache is owned by one builder and dies with it; there is
//! no invalidation.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::debug;
use xxhash_rust::xxh3::Xxh3;

use crate::processor::Rows;

#[derive(Debug, Default)]
pub(crate) struct ResultCache {
    entries: Mutex<FxHashMap<u64, Rows>>,
}

impl ResultCache {
    /// Fingerprint of a requested column sequence within an operation
    /// scope
    ///
    /// The scope keeps lookup results and query results apart even for
    /// identical column requests. Column names are length-prefixed so
    /// `["ab"]` and `["a", "b"]` hash apart.
    pub(crate) fn fingerprint<S: AsRef<str>>(scope: &str, columns: &[S]) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.update(scope.as_bytes());
        hasher.update(&[0xff]);
        for column in columns {
            let column = column.as_ref();
            hasher.update(&(column.len() as u64).to_le_bytes());
            hasher.update(column.as_bytes());
        }
        hasher.digest()
    }

    pub(crate) fn get(&self, fingerprint: u64) -> Option<Rows> {
        let hit = self.entries.lock().get(&fingerprint).cloned();
        if hit.is_some() {
            debug!(target: "kindling::query", fingerprint, "result cache hit");
        }
        hit
    }

    pub(crate) fn put(&self, fingerprint: u64, rows: Rows) {
        self.entries.lock().insert(fingerprint, rows);
    }
}
