//! Native query model consumed by store clients
//!
//! [`StoreQuery`] is the assembled form of accumulated builder state: the
//! bridge builds one fresh per execution, hands it to a client, and never
//! mutates or reuses it. Everything here is serde-serializable so a remote
//! client can ship the query over a wire unchanged.

use crate::error::{Error, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pseudo-column carrying the entity key through processed result rows
///
/// Not a stored field: the result processor injects it, and key extraction
/// (`get_keys`, query-driven delete) reads it back out.
pub const KEY_PSEUDO_COLUMN: &str = "__key__";

/// Comparison operator for property filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Equal
    Eq,
    /// Not equal
    Ne,
    /// Less than
    Lt,
    /// Less than or equal
    Le,
    /// Greater than
    Gt,
    /// Greater than or equal
    Ge,
}

impl Operator {
    /// Parse a textual operator token
    ///
    /// Accepts the usual builder spellings; anything else is an error.
    ///
    /// ```
    /// use kindling_core::Operator;
    ///
    /// assert_eq!(Operator::parse("<=").unwrap(), Operator::Le);
    /// assert_eq!(Operator::parse("<>").unwrap(), Operator::Ne);
    /// assert!(Operator::parse("like").is_err());
    /// ```
    pub fn parse(token: &str) -> Result<Self> {
        match token {
            "=" | "==" => Ok(Operator::Eq),
            "!=" | "<>" => Ok(Operator::Ne),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            _ => Err(Error::InvalidOperator(token.to_string())),
        }
    }

    /// Canonical textual form
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Sort direction for an order clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl OrderDirection {
    /// Map a textual direction
    ///
    /// `desc` in any casing descends; every other string ascends.
    pub fn parse(direction: &str) -> Self {
        if direction.eq_ignore_ascii_case("desc") {
            OrderDirection::Descending
        } else {
            OrderDirection::Ascending
        }
    }
}

/// One translated property predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    /// Property the predicate applies to
    pub property: String,
    /// Comparison operator
    pub op: Operator,
    /// Comparison operand
    pub value: Value,
}

/// One translated order clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyOrder {
    /// Property to order by
    pub property: String,
    /// Sort direction
    pub direction: OrderDirection,
}

/// Assembled native query
///
/// Field semantics follow the store being bridged: an empty `projection`
/// means full entities, `distinct_on` dedupes on the named properties
/// (first occurrence wins), `keys_only` strips all field data, and
/// `offset`/`limit` apply after ordering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreQuery {
    /// Kind to query
    pub kind: String,
    /// Properties to return; empty means all
    pub projection: Vec<String>,
    /// Conjunctive predicates
    pub filters: Vec<PropertyFilter>,
    /// Order clauses, applied in sequence
    pub orders: Vec<PropertyOrder>,
    /// Properties to dedupe on
    pub distinct_on: Vec<String>,
    /// Rows to skip after ordering
    pub offset: Option<u32>,
    /// Maximum rows to return
    pub limit: Option<u32>,
    /// Return keys without field data
    pub keys_only: bool,
}

impl StoreQuery {
    /// Start an empty query against a kind
    pub fn new(kind: impl Into<String>) -> Self {
        StoreQuery {
            kind: kind.into(),
            ..StoreQuery::default()
        }
    }
}
