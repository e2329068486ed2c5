//! Criteria Matching Invariant Tests
//!
//! End-to-end evaluator behavior over an in-memory store:
//! - Empty criteria match every row
//! - SQL three-valued null semantics
//! - Inclusive Between bounds
//! - LIKE wildcard translation
//! - Null-last multi-key sorting
//! - Streaming vs materializing execution

use omniquery::eval::{EvalError, MemorySource, RowSource};
use omniquery::expr::{ConstructionError, Criteria, Predicate, SortKey};
use omniquery::mapping::{Row, TableMapping, ValueType};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn people() -> MemorySource {
    let mapping = TableMapping::new("person")
        .with_field("name", ValueType::Text)
        .with_field("age", ValueType::Integer)
        .with_field("email", ValueType::Text);

    MemorySource::new(mapping)
        .with_row(vec![json!("Ace"), json!(30), json!("ace@example.com")])
        .with_row(vec![json!("Apple"), json!(3), Value::Null])
        .with_row(vec![json!("Bob"), Value::Null, json!("bob@example.com")])
        .with_row(vec![json!("Carol"), json!(1), json!("carol@example.com")])
}

fn names(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .map(|r| r.get(0).as_str().unwrap_or("<null>").to_string())
        .collect()
}

// =============================================================================
// Empty Criteria
// =============================================================================

/// An empty AND criteria matches every row; so does an empty OR.
#[test]
fn test_empty_criteria_matches_every_row() {
    let store = people();
    assert_eq!(store.query(&Criteria::all()).unwrap().len(), 4);
    assert_eq!(store.query(&Criteria::any()).unwrap().len(), 4);
}

// =============================================================================
// Null Semantics
// =============================================================================

/// Null-operand equality is IS NULL, matching only rows whose value is null.
#[test]
fn test_null_equality_is_is_null() {
    let store = people();
    let c = Criteria::all().with_predicate(Predicate::equal("email", Value::Null));
    assert_eq!(names(&store.query(&c).unwrap()), vec!["Apple"]);

    let c = Criteria::all()
        .with_predicate(Predicate::equal("email", Value::Null).invert().unwrap());
    assert_eq!(names(&store.query(&c).unwrap()), vec!["Ace", "Bob", "Carol"]);
}

/// A null row value satisfies neither a range predicate nor its inversion.
#[test]
fn test_null_row_value_outside_both_partitions() {
    let store = people();
    let gt = Predicate::greater("age", json!(2)).unwrap();

    let matched = store.query(&Criteria::all().with_predicate(gt.clone())).unwrap();
    let complement = store
        .query(&Criteria::all().with_predicate(gt.invert().unwrap()))
        .unwrap();

    assert_eq!(names(&matched), vec!["Ace", "Apple"]);
    assert_eq!(names(&complement), vec!["Carol"]);
    // Bob (null age) appears in neither set
    assert_eq!(matched.len() + complement.len(), 3);
}

// =============================================================================
// Between / Like
// =============================================================================

/// Between is inclusive on both ends; its inversion excludes both ends.
#[test]
fn test_between_bounds_inclusive() {
    let store = people();
    let between = Predicate::between("age", json!(1), json!(3)).unwrap();

    let matched = store
        .query(&Criteria::all().with_predicate(between.clone()))
        .unwrap();
    assert_eq!(names(&matched), vec!["Apple", "Carol"]);

    let inverted = store
        .query(&Criteria::all().with_predicate(between.invert().unwrap()))
        .unwrap();
    assert_eq!(names(&inverted), vec!["Ace"]);
}

/// LIKE translates `%` and `_` and treats everything else literally.
#[test]
fn test_like_wildcards() {
    let store = people();
    let c = Criteria::all().with_predicate(Predicate::like("name", "A%e"));
    assert_eq!(names(&store.query(&c).unwrap()), vec!["Ace", "Apple"]);

    let c = Criteria::all().with_predicate(Predicate::like("name", "B_b"));
    assert_eq!(names(&store.query(&c).unwrap()), vec!["Bob"]);
}

/// A backslash-escaped wildcard matches itself literally.
#[test]
fn test_like_escaped_wildcard_is_literal() {
    let mapping = TableMapping::new("t").with_field("note", ValueType::Text);
    let store = MemorySource::new(mapping)
        .with_row(vec![json!("100%")])
        .with_row(vec![json!("1000")]);

    let c = Criteria::all().with_predicate(Predicate::like("note", "100\\%"));
    let rows = store.query(&c).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(0), &json!("100%"));
}

// =============================================================================
// Sorting
// =============================================================================

/// Nulls order after values regardless of direction.
#[test]
fn test_sort_nulls_last() {
    let store = people();
    let c = Criteria::all().with_sort_key(SortKey::ascending("age"));
    let rows = store.query(&c).unwrap();
    assert_eq!(names(&rows), vec!["Carol", "Apple", "Ace", "Bob"]);

    let c = Criteria::all().with_sort_key(SortKey::descending("age"));
    let rows = store.query(&c).unwrap();
    assert_eq!(names(&rows), vec!["Ace", "Apple", "Carol", "Bob"]);
}

/// Pagination slices the sorted result, not the raw store.
#[test]
fn test_pagination_after_sort() {
    let store = people();
    let c = Criteria::all()
        .with_sort_key(SortKey::ascending("age"))
        .with_offset(1)
        .with_limit(2);
    let rows = store.query(&c).unwrap();
    assert_eq!(names(&rows), vec!["Apple", "Ace"]);
}

// =============================================================================
// Construction Errors
// =============================================================================

/// An empty IN-list raises before any row is read.
#[test]
fn test_empty_in_list_raises_at_construction() {
    let err = Predicate::in_list("id", vec![]).unwrap_err();
    assert_eq!(err, ConstructionError::EmptyInList { property: "id".into() });
}

/// Coercion failures surface as typed errors, never as silent misses.
#[test]
fn test_coercion_error_carries_context() {
    let mapping = TableMapping::new("t").with_field("age", ValueType::Integer);
    let store = MemorySource::new(mapping).with_row(vec![json!("young")]);

    let c = Criteria::all().with_predicate(Predicate::greater("age", json!(18)).unwrap());
    let err = store.query(&c).unwrap_err();
    match err {
        EvalError::Coercion { target, value } => {
            assert_eq!(target, ValueType::Integer);
            assert!(value.contains("young"));
        }
        other => panic!("expected coercion error, got {other}"),
    }
}
