//! Query evaluation for the embedded store
//!
//! Filters, orders, distinct, and projection are applied to decoded
//! entities after a kind scan. Comparison semantics follow a
//! property-index view of the data: a filter only matches when the
//! property is present and its value is comparable with the operand,
//! for every operator including not-equal.

use std::borrow::Cow;
use std::cmp::Ordering;

use kindling_core::{
    Entity, Fields, Operator, OrderDirection, PropertyFilter, PropertyOrder, StoreQuery, Value,
    KEY_PSEUDO_COLUMN,
};

/// Compare two property values, returning an ordering if comparable
///
/// Int and Float cross-compare through f64. Everything else compares
/// only within its own type. Mismatched types return `None`.
pub(crate) fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Key(a), Value::Key(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Resolve a property reference on an entity
///
/// `__key__` resolves to the entity key. A dotted name that is not a
/// stored field traverses nested objects segment by segment. Returns
/// `None` when nothing is found.
pub(crate) fn resolve_property<'a>(entity: &'a Entity, property: &str) -> Option<Cow<'a, Value>> {
    if property == KEY_PSEUDO_COLUMN {
        return Some(Cow::Owned(Value::Key(entity.key.clone())));
    }
    if let Some(value) = entity.fields.get(property) {
        return Some(Cow::Borrowed(value));
    }
    if property.contains('.') {
        let mut segments = property.split('.');
        let mut current = entity.fields.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        return Some(Cow::Borrowed(current));
    }
    None
}

fn matches_filter(entity: &Entity, filter: &PropertyFilter) -> bool {
    let Some(actual) = resolve_property(entity, &filter.property) else {
        return false;
    };
    let Some(ordering) = compare_values(&actual, &filter.value) else {
        return false;
    };
    match filter.op {
        Operator::Eq => ordering == Ordering::Equal,
        Operator::Ne => ordering != Ordering::Equal,
        Operator::Lt => ordering == Ordering::Less,
        Operator::Le => ordering != Ordering::Greater,
        Operator::Gt => ordering == Ordering::Greater,
        Operator::Ge => ordering != Ordering::Less,
    }
}

/// True when the entity passes every filter in the conjunction
pub(crate) fn matches_filters(entity: &Entity, filters: &[PropertyFilter]) -> bool {
    filters.iter().all(|filter| matches_filter(entity, filter))
}

/// Sort entities by the order clauses, tie-breaking on key
///
/// Entities missing an ordered property sort before those that have it.
/// Incomparable value pairs are treated as equal and fall through to
/// the next clause.
pub(crate) fn sort_entities(entities: &mut [Entity], orders: &[PropertyOrder]) {
    entities.sort_by(|a, b| {
        for order in orders {
            let left = resolve_property(a, &order.property);
            let right = resolve_property(b, &order.property);
            let ordering = match (left, right) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(l), Some(r)) => compare_values(&l, &r).unwrap_or(Ordering::Equal),
            };
            let ordering = match order.direction {
                OrderDirection::Ascending => ordering,
                OrderDirection::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a.key.cmp(&b.key)
    });
}

/// Drop entities repeating an already-seen distinct signature
///
/// First occurrence wins. Value is not `Hash`, so signatures get a
/// linear scan.
pub(crate) fn dedupe_on(entities: Vec<Entity>, properties: &[String]) -> Vec<Entity> {
    if properties.is_empty() {
        return entities;
    }
    let mut seen: Vec<Vec<Option<Value>>> = Vec::new();
    let mut kept = Vec::new();
    for entity in entities {
        let signature: Vec<Option<Value>> = properties
            .iter()
            .map(|property| resolve_property(&entity, property).map(Cow::into_owned))
            .collect();
        if seen.contains(&signature) {
            continue;
        }
        seen.push(signature);
        kept.push(entity);
    }
    kept
}

/// Apply keys-only or projection to one result entity
///
/// Direct fields keep their stored order. A projected name that is not
/// a stored field but still resolves (a dotted path into nested
/// objects, or `__key__`) is appended under the requested name, so
/// dotted projections come back flattened.
pub(crate) fn project_entity(entity: Entity, query: &StoreQuery) -> Entity {
    if query.keys_only {
        return Entity::new(entity.key, Fields::new());
    }
    if query.projection.is_empty() {
        return entity;
    }
    let mut fields = entity.fields.only(&query.projection);
    for name in &query.projection {
        if fields.contains(name) {
            continue;
        }
        if let Some(value) = resolve_property(&entity, name) {
            fields.insert(name.clone(), value.into_owned());
        }
    }
    Entity::new(entity.key, fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindling_core::Key;

    fn entity(name: &str, fields: Vec<(&str, Value)>) -> Entity {
        Entity::new(Key::named("Task", name), fields.into_iter().collect())
    }

    fn filter(property: &str, op: Operator, value: impl Into<Value>) -> PropertyFilter {
        PropertyFilter {
            property: property.to_string(),
            op,
            value: value.into(),
        }
    }

    // ====================================================================
    // compare_values
    // ====================================================================

    #[test]
    fn test_compare_ints_and_floats_cross_type() {
        assert_eq!(
            compare_values(&Value::Int(1), &Value::Int(2)),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_values(&Value::Int(3), &Value::Float(3.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(
            compare_values(&Value::Float(2.5), &Value::Int(2)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn test_compare_strings_lexicographic() {
        assert_eq!(
            compare_values(&Value::from("alpha"), &Value::from("beta")),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_compare_mismatched_types_none() {
        assert_eq!(compare_values(&Value::from("a"), &Value::Int(1)), None);
        assert_eq!(compare_values(&Value::Bool(true), &Value::Int(1)), None);
        assert_eq!(compare_values(&Value::Null, &Value::Int(0)), None);
    }

    #[test]
    fn test_compare_keys() {
        let a = Value::Key(Key::named("Task", "a"));
        let b = Value::Key(Key::named("Task", "b"));
        assert_eq!(compare_values(&a, &b), Some(Ordering::Less));
    }

    // ====================================================================
    // resolve_property
    // ====================================================================

    #[test]
    fn test_resolve_direct_field() {
        let e = entity("a", vec![("title", Value::from("write docs"))]);
        let resolved = resolve_property(&e, "title").unwrap();
        assert_eq!(resolved.as_ref(), &Value::from("write docs"));
    }

    #[test]
    fn test_resolve_key_pseudo_column() {
        let e = entity("a", vec![]);
        let resolved = resolve_property(&e, KEY_PSEUDO_COLUMN).unwrap();
        assert_eq!(resolved.as_ref(), &Value::Key(Key::named("Task", "a")));
    }

    #[test]
    fn test_resolve_dot_path_through_objects() {
        let nested: Value = vec![("city".to_string(), Value::from("Lyon"))]
            .into_iter()
            .collect::<std::collections::HashMap<_, _>>()
            .into();
        let e = entity("a", vec![("address", nested)]);
        let resolved = resolve_property(&e, "address.city").unwrap();
        assert_eq!(resolved.as_ref(), &Value::from("Lyon"));
    }

    #[test]
    fn test_resolve_dotted_field_name_beats_traversal() {
        let e = entity("a", vec![("address.city", Value::from("Oslo"))]);
        let resolved = resolve_property(&e, "address.city").unwrap();
        assert_eq!(resolved.as_ref(), &Value::from("Oslo"));
    }

    #[test]
    fn test_resolve_missing_returns_none() {
        let e = entity("a", vec![("title", Value::from("x"))]);
        assert!(resolve_property(&e, "missing").is_none());
        assert!(resolve_property(&e, "title.inner").is_none());
        assert!(resolve_property(&e, "missing.inner").is_none());
    }

    // ====================================================================
    // Filter matching
    // ====================================================================

    #[test]
    fn test_filter_eq_and_range() {
        let e = entity("a", vec![("priority", Value::Int(3))]);
        assert!(matches_filters(&e, &[filter("priority", Operator::Eq, 3i64)]));
        assert!(matches_filters(&e, &[filter("priority", Operator::Ge, 3i64)]));
        assert!(matches_filters(&e, &[filter("priority", Operator::Lt, 4i64)]));
        assert!(!matches_filters(&e, &[filter("priority", Operator::Gt, 3i64)]));
    }

    #[test]
    fn test_filter_conjunction() {
        let e = entity(
            "a",
            vec![("priority", Value::Int(3)), ("done", Value::Bool(false))],
        );
        assert!(matches_filters(
            &e,
            &[
                filter("priority", Operator::Ge, 2i64),
                filter("done", Operator::Eq, false),
            ]
        ));
        assert!(!matches_filters(
            &e,
            &[
                filter("priority", Operator::Ge, 2i64),
                filter("done", Operator::Eq, true),
            ]
        ));
    }

    #[test]
    fn test_filter_absent_property_never_matches() {
        let e = entity("a", vec![("title", Value::from("x"))]);
        assert!(!matches_filters(&e, &[filter("missing", Operator::Eq, 1i64)]));
        assert!(!matches_filters(&e, &[filter("missing", Operator::Ne, 1i64)]));
    }

    #[test]
    fn test_filter_incomparable_never_matches() {
        let e = entity("a", vec![("title", Value::from("x"))]);
        // Not-equal included: incomparable values are outside the filter's domain.
        assert!(!matches_filters(&e, &[filter("title", Operator::Ne, 1i64)]));
        assert!(!matches_filters(&e, &[filter("title", Operator::Lt, 1i64)]));
    }

    #[test]
    fn test_filter_on_key_pseudo_column() {
        let e = entity("a", vec![]);
        let target = Value::Key(Key::named("Task", "a"));
        assert!(matches_filters(
            &e,
            &[filter(KEY_PSEUDO_COLUMN, Operator::Eq, target)]
        ));
    }

    // ====================================================================
    // Sorting
    // ====================================================================

    #[test]
    fn test_sort_multi_clause_with_directions() {
        let mut entities = vec![
            entity("a", vec![("group", Value::Int(1)), ("rank", Value::Int(2))]),
            entity("b", vec![("group", Value::Int(2)), ("rank", Value::Int(1))]),
            entity("c", vec![("group", Value::Int(1)), ("rank", Value::Int(9))]),
        ];
        let orders = vec![
            PropertyOrder {
                property: "group".to_string(),
                direction: OrderDirection::Ascending,
            },
            PropertyOrder {
                property: "rank".to_string(),
                direction: OrderDirection::Descending,
            },
        ];
        sort_entities(&mut entities, &orders);
        let names: Vec<String> = entities
            .iter()
            .map(|e| e.key.path_end_identifier().unwrap())
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_sort_missing_property_first() {
        let mut entities = vec![
            entity("a", vec![("rank", Value::Int(1))]),
            entity("b", vec![]),
        ];
        sort_entities(
            &mut entities,
            &[PropertyOrder {
                property: "rank".to_string(),
                direction: OrderDirection::Ascending,
            }],
        );
        assert_eq!(entities[0].key, Key::named("Task", "b"));
    }

    #[test]
    fn test_sort_no_orders_is_key_order() {
        let mut entities = vec![entity("b", vec![]), entity("a", vec![])];
        sort_entities(&mut entities, &[]);
        assert_eq!(entities[0].key, Key::named("Task", "a"));
        assert_eq!(entities[1].key, Key::named("Task", "b"));
    }

    // ====================================================================
    // Distinct
    // ====================================================================

    #[test]
    fn test_dedupe_first_occurrence_wins() {
        let entities = vec![
            entity("a", vec![("city", Value::from("Lyon"))]),
            entity("b", vec![("city", Value::from("Oslo"))]),
            entity("c", vec![("city", Value::from("Lyon"))]),
        ];
        let kept = dedupe_on(entities, &["city".to_string()]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].key, Key::named("Task", "a"));
        assert_eq!(kept[1].key, Key::named("Task", "b"));
    }

    #[test]
    fn test_dedupe_absent_is_its_own_signature() {
        let entities = vec![
            entity("a", vec![]),
            entity("b", vec![("city", Value::from("Lyon"))]),
            entity("c", vec![]),
        ];
        let kept = dedupe_on(entities, &["city".to_string()]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_dedupe_empty_properties_keeps_all() {
        let entities = vec![
            entity("a", vec![("city", Value::from("Lyon"))]),
            entity("b", vec![("city", Value::from("Lyon"))]),
        ];
        assert_eq!(dedupe_on(entities, &[]).len(), 2);
    }

    // ====================================================================
    // Projection
    // ====================================================================

    #[test]
    fn test_project_keys_only_strips_fields() {
        let e = entity("a", vec![("title", Value::from("x"))]);
        let mut query = StoreQuery::new("Task");
        query.keys_only = true;
        let projected = project_entity(e, &query);
        assert!(projected.fields.is_empty());
        assert_eq!(projected.key, Key::named("Task", "a"));
    }

    #[test]
    fn test_project_subset_keeps_field_order() {
        let e = entity(
            "a",
            vec![
                ("title", Value::from("x")),
                ("done", Value::Bool(true)),
                ("rank", Value::Int(1)),
            ],
        );
        let mut query = StoreQuery::new("Task");
        query.projection = vec!["rank".to_string(), "title".to_string()];
        let projected = project_entity(e, &query);
        let names: Vec<&str> = projected.fields.names().collect();
        assert_eq!(names, vec!["title", "rank"]);
    }

    #[test]
    fn test_project_empty_projection_keeps_everything() {
        let e = entity("a", vec![("title", Value::from("x"))]);
        let query = StoreQuery::new("Task");
        let projected = project_entity(e, &query);
        assert_eq!(projected.fields.len(), 1);
    }

    #[test]
    fn test_project_flattens_dotted_paths() {
        let nested: Value = vec![("city".to_string(), Value::from("Lyon"))]
            .into_iter()
            .collect::<std::collections::HashMap<_, _>>()
            .into();
        let e = entity("a", vec![("address", nested), ("title", Value::from("x"))]);
        let mut query = StoreQuery::new("Task");
        query.projection = vec!["address.city".to_string(), "missing.path".to_string()];
        let projected = project_entity(e, &query);
        assert_eq!(projected.fields.get("address.city"), Some(&Value::from("Lyon")));
        assert!(!projected.fields.contains("address"));
        assert!(!projected.fields.contains("missing.path"));
    }

    #[test]
    fn test_project_key_pseudo_column_materializes() {
        let e = entity("a", vec![("title", Value::from("x"))]);
        let mut query = StoreQuery::new("Task");
        query.projection = vec!["title".to_string(), KEY_PSEUDO_COLUMN.to_string()];
        let projected = project_entity(e, &query);
        assert_eq!(
            projected.fields.get(KEY_PSEUDO_COLUMN),
            Some(&Value::Key(Key::named("Task", "a")))
        );
    }
}
