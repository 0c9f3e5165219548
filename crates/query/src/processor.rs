//! Result processing seam
//!
//! Raw store results are `Entity` values; callers see [`Row`]s. The
//! [`ResultProcessor`] trait sits between the two so result shaping can
//! be swapped without touching the bridge. The default processor keeps
//! stored fields in stored order and appends the entity key under the
//! `__key__` pseudo-column, which later stages (key extraction,
//! query-driven delete) rely on.

use std::sync::Arc;

use kindling_core::{Entity, Fields, Value, KEY_PSEUDO_COLUMN};
use once_cell::sync::Lazy;

use crate::state::QueryState;

/// One processed result row
pub type Row = Fields;

/// Processed result rows, in result order
pub type Rows = Vec<Row>;

/// Turns raw store entities into caller-facing rows
///
/// Thread safety: processors are shared across builders behind `Arc`,
/// so implementations must be `Send + Sync`.
pub trait ResultProcessor: Send + Sync {
    /// Process one raw entity into a row
    fn process_single(&self, state: &QueryState, entity: Entity) -> Row;

    /// Process a whole result batch, preserving order
    fn process_results(&self, state: &QueryState, entities: Vec<Entity>) -> Rows {
        entities
            .into_iter()
            .map(|entity| self.process_single(state, entity))
            .collect()
    }
}

/// Default processor: stored fields plus the `__key__` pseudo-column
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityProcessor;

impl EntityProcessor {
    /// Shared instance handed to builders that don't inject their own
    pub fn shared() -> Arc<dyn ResultProcessor> {
        static SHARED: Lazy<Arc<dyn ResultProcessor>> = Lazy::new(|| Arc::new(EntityProcessor));
        SHARED.clone()
    }
}

impl ResultProcessor for EntityProcessor {
    fn process_single(&self, _state: &QueryState, entity: Entity) -> Row {
        let mut row = entity.fields;
        row.insert(KEY_PSEUDO_COLUMN, Value::Key(entity.key));
        row
    }
}
