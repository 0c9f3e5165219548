//! State-to-native translation
//!
//! ## Contract
//!
//! Only [`Filter::Basic`] has a native form. Any other recorded filter
//! kind makes translation fail with `UnsupportedFilter` naming it; a
//! predicate is never silently dropped from the assembled query.

use kindling_core::{PropertyFilter, PropertyOrder};

use crate::error::{Error, Result};
use crate::state::{Filter, OrderClause};

pub(crate) fn translate_filters(filters: &[Filter]) -> Result<Vec<PropertyFilter>> {
    filters
        .iter()
        .map(|filter| match filter {
            Filter::Basic { column, op, value } => Ok(PropertyFilter {
                property: column.clone(),
                op: *op,
                value: value.clone(),
            }),
            other => Err(Error::UnsupportedFilter {
                kind: other.kind_name().to_string(),
            }),
        })
        .collect()
}

pub(crate) fn translate_orders(orders: &[OrderClause]) -> Vec<PropertyOrder> {
    orders
        .iter()
        .map(|order| PropertyOrder {
            property: order.column.clone(),
            direction: order.direction,
        })
        .collect()
}
