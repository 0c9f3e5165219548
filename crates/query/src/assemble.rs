//! Query assembly
//!
//! Builds one fresh [`StoreQuery`] from accumulated state per
//! execution. Assembly never mutates the state it reads; projection
//! merging happens before it in [`resolve_projection`], which does
//! persist its effect on the builder.

use kindling_core::StoreQuery;
use tracing::debug;

use crate::error::{Error, Result};
use crate::state::{DistinctMode, QueryState, ALL_COLUMNS};
use crate::translate;

/// Merge requested per-call columns into the state projection
///
/// Requested columns append to whatever the state already holds,
/// duplicates included. If the composed projection mentions `*` it
/// collapses to empty, which means full entities. Both the append and
/// the collapse persist on the state for later calls.
pub(crate) fn resolve_projection<S: AsRef<str>>(state: &mut QueryState, requested: &[S]) {
    state
        .columns
        .extend(requested.iter().map(|column| column.as_ref().to_string()));
    if state.columns.iter().any(|column| column == ALL_COLUMNS) {
        state.columns.clear();
    }
}

/// Build the native query for the current state
///
/// Distinct-on-projection with no projected columns is checked before
/// filter translation.
pub(crate) fn assemble(state: &QueryState) -> Result<StoreQuery> {
    let distinct_on = match &state.distinct {
        DistinctMode::Off => Vec::new(),
        DistinctMode::OnProjection => {
            if state.columns.is_empty() {
                return Err(Error::DistinctRequiresColumns);
            }
            state.columns.clone()
        }
        DistinctMode::On(columns) => columns.clone(),
    };

    let query = StoreQuery {
        kind: state.kind.clone(),
        projection: state.columns.clone(),
        filters: translate::translate_filters(&state.filters)?,
        orders: translate::translate_orders(&state.orders),
        distinct_on,
        offset: state.offset,
        limit: state.limit,
        keys_only: state.keys_only,
    };
    debug!(
        target: "kindling::query",
        kind = %query.kind,
        filters = query.filters.len(),
        keys_only = query.keys_only,
        "query assembled"
    );
    Ok(query)
}
