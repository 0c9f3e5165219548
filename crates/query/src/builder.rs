//! Fluent query builder bridged onto a store client
//!
//! ## Design
//!
//! - The client and the result processor are injected at construction;
//!   the builder owns no backend of its own
//! - Fluent setters consume and return `self`; terminal operations
//!   (in `read`, `write`, `delete`) take `&mut self`
//! - One builder, one caller: state accumulates across calls on purpose
//!   (projection merges persist), and the memo cache lives and dies
//!   with the builder
//!
//! ```ignore
//! let store = Arc::new(MemoryStore::new());
//! let mut tasks = Builder::new(store)
//!     .kind("Task")
//!     .filter("done", Operator::Eq, false)
//!     .order_by_desc("priority")
//!     .limit(10);
//! let rows = tasks.get()?;
//! ```

use std::fmt;
use std::mem;
use std::sync::Arc;

use kindling_core::{Operator, OrderDirection, Value};
use kindling_store::StoreClient;

use crate::cache::ResultCache;
use crate::error::{Error, Result};
use crate::processor::{EntityProcessor, ResultProcessor};
use crate::state::{DistinctMode, Filter, OrderClause, QueryState};

/// Hook invoked once, with the state, before the insert family builds
/// entities
pub type BeforeQueryHook = Box<dyn FnOnce(&QueryState) + Send>;

/// Fluent query builder bridged onto a store client
pub struct Builder {
    pub(crate) client: Arc<dyn StoreClient>,
    pub(crate) processor: Arc<dyn ResultProcessor>,
    pub(crate) state: QueryState,
    pub(crate) cache: ResultCache,
    pub(crate) hooks: Vec<BeforeQueryHook>,
}

impl Builder {
    /// Build against a client with the default result processor
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self::with_processor(client, EntityProcessor::shared())
    }

    /// Build against a client with an injected result processor
    pub fn with_processor(client: Arc<dyn StoreClient>, processor: Arc<dyn ResultProcessor>) -> Self {
        Builder {
            client,
            processor,
            state: QueryState::default(),
            cache: ResultCache::default(),
            hooks: Vec::new(),
        }
    }

    /// Accumulated state, as the terminals will see it
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    // ====================================================================
    // Fluent setters
    // ====================================================================

    /// Target a kind
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.state.kind = kind.into();
        self
    }

    /// Replace the projection with the given columns
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append columns to the projection
    pub fn add_select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Record a `column <op> value` filter
    pub fn filter(mut self, column: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        self.state.filters.push(Filter::Basic {
            column: column.into(),
            op,
            value: value.into(),
        });
        self
    }

    /// Record a `column IS NULL` filter
    ///
    /// Recorded as stated; execution rejects it as unsupported.
    pub fn filter_null(mut self, column: impl Into<String>) -> Self {
        self.state.filters.push(Filter::Null {
            column: column.into(),
        });
        self
    }

    /// Record a `column IN (values)` filter
    ///
    /// Recorded as stated; execution rejects it as unsupported.
    pub fn filter_in<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.state.filters.push(Filter::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Order ascending by a column
    pub fn order_by(self, column: impl Into<String>) -> Self {
        self.order_with(column, OrderDirection::Ascending)
    }

    /// Order descending by a column
    pub fn order_by_desc(self, column: impl Into<String>) -> Self {
        self.order_with(column, OrderDirection::Descending)
    }

    /// Order by a column with a textual direction
    ///
    /// `desc` in any casing descends; everything else ascends.
    pub fn order_by_direction(self, column: impl Into<String>, direction: &str) -> Self {
        self.order_with(column, OrderDirection::parse(direction))
    }

    fn order_with(mut self, column: impl Into<String>, direction: OrderDirection) -> Self {
        self.state.orders.push(OrderClause {
            column: column.into(),
            direction,
        });
        self
    }

    /// Skip rows
    pub fn offset(mut self, offset: u32) -> Self {
        self.state.offset = Some(offset);
        self
    }

    /// Cap the row count
    pub fn limit(mut self, limit: u32) -> Self {
        self.state.limit = Some(limit);
        self
    }

    /// Dedupe on the resolved projection
    ///
    /// Execution fails with `DistinctRequiresColumns` if the projection
    /// resolves to full entities.
    pub fn distinct(mut self) -> Self {
        self.state.distinct = DistinctMode::OnProjection;
        self
    }

    /// Dedupe on an explicit column list
    pub fn distinct_on<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.distinct = DistinctMode::On(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Return keys without field data
    pub fn keys_only(mut self) -> Self {
        self.state.keys_only = true;
        self
    }

    /// Register a hook to run before the insert family builds entities
    pub fn before_query(mut self, hook: impl FnOnce(&QueryState) + Send + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    // ====================================================================
    // Terminal plumbing
    // ====================================================================

    pub(crate) fn apply_before_query_hooks(&mut self) {
        for hook in mem::take(&mut self.hooks) {
            hook(&self.state);
        }
    }

    pub(crate) fn require_kind(&self, operation: &str) -> Result<&str> {
        if self.state.kind.is_empty() {
            return Err(Error::missing_kind(operation));
        }
        Ok(&self.state.kind)
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
