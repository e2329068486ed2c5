//! Multi-key row ordering
//!
//! Sort keys apply in declared order; the sort is stable. Nulls order after
//! non-null values regardless of direction — this is a deliberate
//! normalization (real SQL engines disagree among themselves here) and it is
//! shared by the join planner's post-join sort.

use std::cmp::Ordering;

use serde_json::Value;

use crate::expr::{SortDirection, SortKey};
use crate::mapping::{Mapping, Row, RowLayout, ValueType};

use super::coerce::coerce;
use super::errors::{EvalError, EvalResult};

/// Total order over two non-null comparison-ready values.
///
/// Same-type values compare naturally; mixed types fall back to a fixed
/// type rank so the order is still total and deterministic.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn type_rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let xf = x.as_f64().unwrap_or(0.0);
            let yf = y.as_f64().unwrap_or(0.0);
            xf.partial_cmp(&yf).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Null-last comparison: nulls sort after values in both directions
pub(crate) fn compare_nullable(a: &Value, b: &Value, descending: bool) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = compare_values(a, b);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
    }
}

#[derive(Debug)]
struct PreparedKey {
    index: usize,
    value_type: Option<ValueType>,
    descending: bool,
}

/// Stable multi-key comparator over rows of one layout.
///
/// Key columns and types resolve once at construction; sorting then
/// pre-coerces every key value (decorate/sort/undecorate) so coercion
/// failures surface as errors instead of being absorbed into an arbitrary
/// order.
#[derive(Debug)]
pub struct RowComparator {
    keys: Vec<PreparedKey>,
}

impl RowComparator {
    pub fn new(
        mapping: &dyn Mapping,
        layout: &RowLayout,
        sort_keys: &[SortKey],
    ) -> EvalResult<Self> {
        let mut keys = Vec::with_capacity(sort_keys.len());
        for key in sort_keys {
            if key.direction == SortDirection::Expression {
                return Err(EvalError::ComputedSortExpression {
                    expression: key.property.clone(),
                });
            }
            let index = layout
                .index_of_property(mapping, &key.property)
                .ok_or_else(|| EvalError::UnknownProperty {
                    property: key.property.clone(),
                    table: mapping.table().to_string(),
                })?;
            let column = mapping.column_for(&key.property).unwrap_or(&key.property);
            keys.push(PreparedKey {
                index,
                value_type: mapping.type_of_column(column),
                descending: key.direction == SortDirection::Descending,
            });
        }
        Ok(Self { keys })
    }

    /// Orders two rows by the prepared keys
    pub fn compare(&self, a: &Row, b: &Row) -> EvalResult<Ordering> {
        let ka = self.key_values(a)?;
        let kb = self.key_values(b)?;
        Ok(self.compare_key_values(&ka, &kb))
    }

    /// Stable sort of a fully materialized row set
    pub fn sort_rows(&self, rows: Vec<Row>) -> EvalResult<Vec<Row>> {
        let mut decorated = Vec::with_capacity(rows.len());
        for row in rows {
            let keys = self.key_values(&row)?;
            decorated.push((keys, row));
        }
        decorated.sort_by(|a, b| self.compare_key_values(&a.0, &b.0));
        Ok(decorated.into_iter().map(|(_, row)| row).collect())
    }

    fn key_values(&self, row: &Row) -> EvalResult<Vec<Value>> {
        self.keys
            .iter()
            .map(|key| {
                let raw = row.get(key.index);
                match key.value_type {
                    Some(t) => coerce(raw, t),
                    None => Ok(raw.clone()),
                }
            })
            .collect()
    }

    fn compare_key_values(&self, a: &[Value], b: &[Value]) -> Ordering {
        for (key, (av, bv)) in self.keys.iter().zip(a.iter().zip(b.iter())) {
            let ordering = compare_nullable(av, bv, key.descending);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::TableMapping;
    use serde_json::json;

    fn mapping() -> TableMapping {
        TableMapping::new("t")
            .with_field("age", ValueType::Integer)
            .with_field("name", ValueType::Text)
    }

    fn rows(values: &[(Value, &str)]) -> Vec<Row> {
        values
            .iter()
            .map(|(age, name)| Row::new(vec![age.clone(), json!(name)]))
            .collect()
    }

    #[test]
    fn test_nulls_sort_last_ascending() {
        let m = mapping();
        let layout = RowLayout::from_mapping(&m);
        let cmp = RowComparator::new(&m, &layout, &[SortKey::ascending("age")]).unwrap();

        let sorted = cmp
            .sort_rows(rows(&[(Value::Null, "n"), (json!(3), "c"), (json!(1), "a")]))
            .unwrap();
        let ages: Vec<&Value> = sorted.iter().map(|r| r.get(0)).collect();
        assert_eq!(ages, vec![&json!(1), &json!(3), &Value::Null]);
    }

    #[test]
    fn test_nulls_sort_last_descending_too() {
        let m = mapping();
        let layout = RowLayout::from_mapping(&m);
        let cmp = RowComparator::new(&m, &layout, &[SortKey::descending("age")]).unwrap();

        let sorted = cmp
            .sort_rows(rows(&[(json!(1), "a"), (Value::Null, "n"), (json!(3), "c")]))
            .unwrap();
        let ages: Vec<&Value> = sorted.iter().map(|r| r.get(0)).collect();
        assert_eq!(ages, vec![&json!(3), &json!(1), &Value::Null]);
    }

    #[test]
    fn test_multi_key_precedence() {
        let m = mapping();
        let layout = RowLayout::from_mapping(&m);
        let cmp = RowComparator::new(
            &m,
            &layout,
            &[SortKey::ascending("age"), SortKey::descending("name")],
        )
        .unwrap();

        let sorted = cmp
            .sort_rows(rows(&[(json!(1), "a"), (json!(1), "b"), (json!(0), "z")]))
            .unwrap();
        let names: Vec<&Value> = sorted.iter().map(|r| r.get(1)).collect();
        assert_eq!(names, vec![&json!("z"), &json!("b"), &json!("a")]);
    }

    #[test]
    fn test_sort_coerces_physical_strings() {
        // CSV-like stores deliver everything as text; "10" must sort after "9"
        let m = mapping();
        let layout = RowLayout::from_mapping(&m);
        let cmp = RowComparator::new(&m, &layout, &[SortKey::ascending("age")]).unwrap();

        let sorted = cmp
            .sort_rows(rows(&[(json!("10"), "b"), (json!("9"), "a")]))
            .unwrap();
        let names: Vec<&Value> = sorted.iter().map(|r| r.get(1)).collect();
        assert_eq!(names, vec![&json!("a"), &json!("b")]);
    }

    #[test]
    fn test_sort_surfaces_coercion_failure() {
        let m = mapping();
        let layout = RowLayout::from_mapping(&m);
        let cmp = RowComparator::new(&m, &layout, &[SortKey::ascending("age")]).unwrap();

        let err = cmp
            .sort_rows(rows(&[(json!("oops"), "a"), (json!(1), "b")]))
            .unwrap_err();
        assert!(matches!(err, EvalError::Coercion { .. }));
    }

    #[test]
    fn test_expression_keys_rejected_in_memory() {
        let m = mapping();
        let layout = RowLayout::from_mapping(&m);
        let err =
            RowComparator::new(&m, &layout, &[SortKey::expression("LENGTH(name)")]).unwrap_err();
        assert_eq!(
            err,
            EvalError::ComputedSortExpression {
                expression: "LENGTH(name)".into()
            }
        );
    }

    #[test]
    fn test_unknown_sort_property() {
        let m = mapping();
        let layout = RowLayout::from_mapping(&m);
        let err = RowComparator::new(&m, &layout, &[SortKey::ascending("missing")]).unwrap_err();
        assert!(matches!(err, EvalError::UnknownProperty { .. }));
    }
}
