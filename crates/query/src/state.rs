//! Accumulated fluent-builder state
//!
//! [`QueryState`] is the generic vocabulary the builder records and the
//! bridge later translates. Nothing here talks to a store: state is
//! plain data, serializable, and carries whatever the caller said even
//! when it has no native form (translation decides that later).

use kindling_core::{Key, Operator, OrderDirection, Value};
use serde::{Deserialize, Serialize};

/// Projection sentinel meaning "all columns"
pub const ALL_COLUMNS: &str = "*";

/// One recorded filter descriptor
///
/// A closed vocabulary. Only [`Filter::Basic`] has a native query form;
/// the other kinds are recorded as stated and rejected explicitly at
/// assembly time rather than silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// `column <op> value`
    Basic {
        /// Column the predicate applies to
        column: String,
        /// Comparison operator
        op: Operator,
        /// Comparison operand
        value: Value,
    },
    /// `column IS NULL`
    Null {
        /// Column the predicate applies to
        column: String,
    },
    /// `column IN (values)`
    In {
        /// Column the predicate applies to
        column: String,
        /// Accepted values
        values: Vec<Value>,
    },
}

impl Filter {
    /// Short name of the filter kind, used in error reporting
    pub fn kind_name(&self) -> &'static str {
        match self {
            Filter::Basic { .. } => "basic",
            Filter::Null { .. } => "null",
            Filter::In { .. } => "in",
        }
    }
}

/// Distinct behavior recorded on the state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum DistinctMode {
    /// No dedupe
    #[default]
    Off,
    /// Dedupe on whatever the projection resolves to
    OnProjection,
    /// Dedupe on an explicit column list
    On(Vec<String>),
}

/// One recorded order clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderClause {
    /// Column to order by
    pub column: String,
    /// Sort direction
    pub direction: OrderDirection,
}

/// Everything the fluent setters have accumulated
///
/// An empty `kind` means none was set; operations that need one check
/// and fail fast. `columns` may hold the `*` sentinel until projection
/// resolution collapses it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryState {
    /// Kind the builder targets; empty when unset
    pub kind: String,
    /// Accumulated projection, possibly containing `*`
    pub columns: Vec<String>,
    /// Recorded filters, in call order
    pub filters: Vec<Filter>,
    /// Recorded order clauses, in call order
    pub orders: Vec<OrderClause>,
    /// Rows to skip
    pub offset: Option<u32>,
    /// Maximum rows to return
    pub limit: Option<u32>,
    /// Distinct behavior
    pub distinct: DistinctMode,
    /// Return keys without field data
    pub keys_only: bool,
}

/// Raw identifier a caller hands to key-resolving operations
///
/// Resolution always renders a *named* key: numeric identifiers become
/// their decimal string. Callers wanting a numeric-id key construct one
/// with [`Key::with_id`] and use the key-taking operations instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ident {
    /// Numeric identifier, rendered to decimal on resolution
    Int(i64),
    /// String identifier
    Str(String),
}

impl Ident {
    /// Render as the name of a named key
    pub fn as_name(&self) -> String {
        match self {
            Ident::Int(id) => id.to_string(),
            Ident::Str(name) => name.clone(),
        }
    }
}

impl From<i64> for Ident {
    fn from(id: i64) -> Self {
        Ident::Int(id)
    }
}

impl From<&str> for Ident {
    fn from(name: &str) -> Self {
        Ident::Str(name.to_string())
    }
}

impl From<String> for Ident {
    fn from(name: String) -> Self {
        Ident::Str(name)
    }
}

/// One element of a heterogeneous delete target list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KeyTarget {
    /// Already-resolved key, passed through untouched
    Key(Key),
    /// Raw identifier, resolved against the builder's kind
    Id(Ident),
}

impl From<Key> for KeyTarget {
    fn from(key: Key) -> Self {
        KeyTarget::Key(key)
    }
}

impl From<Ident> for KeyTarget {
    fn from(ident: Ident) -> Self {
        KeyTarget::Id(ident)
    }
}

impl From<i64> for KeyTarget {
    fn from(id: i64) -> Self {
        KeyTarget::Id(Ident::Int(id))
    }
}

impl From<&str> for KeyTarget {
    fn from(name: &str) -> Self {
        KeyTarget::Id(Ident::Str(name.to_string()))
    }
}
