//! Delete-side terminal operations
//!
//! Every path funnels through [`Builder::delete_keys`], which issues
//! the batch delete against the client. Raw-identifier forms resolve
//! to named keys against the builder's kind first; the filtered form
//! runs the accumulated query keys-only and deletes what it matched.
//! Empty inputs short-circuit without a client call.

use kindling_core::Key;
use tracing::debug;

use crate::builder::Builder;
use crate::error::Result;
use crate::read::extract_keys;
use crate::state::{Ident, KeyTarget};

impl Builder {
    /// Delete every entity the accumulated query matches
    ///
    /// Runs the query keys-only; returns the number of entities
    /// removed.
    pub fn delete(&mut self) -> Result<u64> {
        self.state.keys_only = true;
        let rows = self.get()?;
        let keys = extract_keys(&rows);
        self.delete_keys(keys)
    }

    /// Delete one entity by key
    pub fn delete_key(&mut self, key: Key) -> Result<u64> {
        self.delete_keys(vec![key])
    }

    /// Delete entities by key
    ///
    /// Keys with no stored entity are skipped; the count covers
    /// entities actually removed.
    pub fn delete_keys(&mut self, keys: Vec<Key>) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let deleted = self.client.delete_batch(keys)?;
        debug!(target: "kindling::query", deleted, "delete committed");
        Ok(deleted)
    }

    /// Delete one entity by raw identifier against the kind
    pub fn delete_id(&mut self, ident: impl Into<Ident>) -> Result<u64> {
        self.delete_ids(vec![ident.into()])
    }

    /// Delete entities by raw identifier against the kind
    pub fn delete_ids(&mut self, idents: Vec<Ident>) -> Result<u64> {
        if idents.is_empty() {
            return Ok(0);
        }
        let kind = self.require_kind("delete")?.to_string();
        let keys = idents
            .into_iter()
            .map(|ident| Key::named(&kind, ident.as_name()))
            .collect();
        self.delete_keys(keys)
    }

    /// Delete entities by mixed key and identifier targets
    ///
    /// The kind is only required when at least one target is a raw
    /// identifier.
    pub fn delete_targets(&mut self, targets: Vec<KeyTarget>) -> Result<u64> {
        if targets.is_empty() {
            return Ok(0);
        }
        let mut keys = Vec::with_capacity(targets.len());
        for target in targets {
            let key = match target {
                KeyTarget::Key(key) => key,
                KeyTarget::Id(ident) => {
                    let kind = self.require_kind("delete")?.to_string();
                    Key::named(kind, ident.as_name())
                }
            };
            keys.push(key);
        }
        self.delete_keys(keys)
    }
}
