//! Row-at-a-time criteria matching
//!
//! Reproduces SQL's three-valued comparison semantics: any comparison
//! touching null (other than an explicit IS NULL test) is unsatisfiable and
//! the row does not match, for either polarity. Predicates evaluate strictly
//! left-to-right with combinator short-circuiting, so per-predicate trace
//! output always fires in declared order.

use std::cmp::Ordering;

use serde_json::Value;
use tracing::trace;

use crate::expr::{Combinator, Criteria, Predicate};
use crate::mapping::{Mapping, Row, RowLayout};

use super::coerce::{coerce, coerce_to_operand};
use super::errors::{EvalError, EvalResult};
use super::like::like_regex;
use super::sorter::compare_values;

/// Evaluates criteria against rows of one layout
pub struct RowMatcher<'a> {
    mapping: &'a dyn Mapping,
    layout: &'a RowLayout,
}

impl<'a> RowMatcher<'a> {
    pub fn new(mapping: &'a dyn Mapping, layout: &'a RowLayout) -> Self {
        Self { mapping, layout }
    }

    /// Decides whether one row matches the criteria.
    ///
    /// An empty predicate list matches every row, for both combinators.
    pub fn matches(&self, row: &Row, criteria: &Criteria) -> EvalResult<bool> {
        if criteria.predicates.is_empty() {
            return Ok(true);
        }
        match criteria.combinator {
            Combinator::And => {
                for predicate in &criteria.predicates {
                    let hit = self.matches_predicate(row, predicate)?;
                    trace!(
                        target: "omniquery::eval",
                        predicate = predicate.name(),
                        property = predicate.property().unwrap_or(""),
                        hit,
                        "evaluated predicate"
                    );
                    if !hit {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Combinator::Or => {
                for predicate in &criteria.predicates {
                    let hit = self.matches_predicate(row, predicate)?;
                    trace!(
                        target: "omniquery::eval",
                        predicate = predicate.name(),
                        property = predicate.property().unwrap_or(""),
                        hit,
                        "evaluated predicate"
                    );
                    if hit {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    fn matches_predicate(&self, row: &Row, predicate: &Predicate) -> EvalResult<bool> {
        match predicate {
            Predicate::Equal {
                property,
                value,
                polarity,
            } => {
                let actual = self.value_of(row, property)?;
                if value.is_null() {
                    // IS NULL / IS NOT NULL
                    return Ok(actual.is_null() == *polarity);
                }
                if actual.is_null() {
                    return Ok(false);
                }
                let (a, b) = self.comparable_pair(actual, value, property)?;
                Ok((compare_values(&a, &b) == Ordering::Equal) == *polarity)
            }
            Predicate::EqualInsensitive {
                property,
                value,
                polarity,
            } => {
                let actual = self.value_of(row, property)?;
                if value.is_null() {
                    return Ok(actual.is_null() == *polarity);
                }
                if actual.is_null() {
                    return Ok(false);
                }
                let a = text_of(actual);
                let b = text_of(value);
                Ok((a.to_lowercase() == b.to_lowercase()) == *polarity)
            }
            Predicate::Between {
                property,
                min,
                max,
                polarity,
            } => {
                let actual = self.value_of(row, property)?;
                if actual.is_null() {
                    return Ok(false);
                }
                let (a, lo) = self.comparable_pair(actual, min, property)?;
                let (_, hi) = self.comparable_pair(actual, max, property)?;
                let inside = compare_values(&a, &lo) != Ordering::Less
                    && compare_values(&a, &hi) != Ordering::Greater;
                Ok(inside == *polarity)
            }
            Predicate::Greater {
                property,
                value,
                polarity,
            } => {
                let actual = self.value_of(row, property)?;
                if actual.is_null() {
                    return Ok(false);
                }
                let (a, b) = self.comparable_pair(actual, value, property)?;
                Ok((compare_values(&a, &b) == Ordering::Greater) == *polarity)
            }
            Predicate::Lesser {
                property,
                value,
                polarity,
            } => {
                let actual = self.value_of(row, property)?;
                if actual.is_null() {
                    return Ok(false);
                }
                let (a, b) = self.comparable_pair(actual, value, property)?;
                Ok((compare_values(&a, &b) == Ordering::Less) == *polarity)
            }
            Predicate::Like {
                property,
                pattern,
                polarity,
            } => self.matches_like(row, property, pattern, false, *polarity),
            Predicate::LikeInsensitive {
                property,
                pattern,
                polarity,
            } => self.matches_like(row, property, pattern, true, *polarity),
            Predicate::BitwiseAnd {
                property,
                mask,
                polarity,
            } => {
                let actual = self.value_of(row, property)?;
                if actual.is_null() {
                    return Ok(false);
                }
                let coerced = coerce(actual, crate::mapping::ValueType::Integer)?;
                let bits = coerced.as_i64().unwrap_or(0);
                Ok(((bits & mask) != 0) == *polarity)
            }
            Predicate::InList {
                property,
                values,
                polarity,
            } => {
                let actual = self.value_of(row, property)?;
                if actual.is_null() {
                    return Ok(false);
                }
                let mut found = false;
                for candidate in values {
                    // The row value coerces toward each candidate's type,
                    // not the other way around
                    let coerced = coerce_to_operand(actual, candidate)?;
                    if compare_values(&coerced, candidate) == Ordering::Equal {
                        found = true;
                        break;
                    }
                }
                Ok(found == *polarity)
            }
            Predicate::Nested { criteria, polarity } => {
                // The group collapses to a single boolean before polarity
                Ok(self.matches(row, criteria)? == *polarity)
            }
            Predicate::RawFragment { .. } => Err(EvalError::UnsupportedPredicate {
                predicate: "RawFragment",
            }),
        }
    }

    fn matches_like(
        &self,
        row: &Row,
        property: &str,
        pattern: &str,
        case_insensitive: bool,
        polarity: bool,
    ) -> EvalResult<bool> {
        let actual = self.value_of(row, property)?;
        if actual.is_null() {
            return Ok(false);
        }
        let regex = like_regex(pattern, case_insensitive)?;
        Ok(regex.is_match(&text_of(actual)) == polarity)
    }

    /// Both sides coerced to the mapping's column type, or to the operand's
    /// runtime type where the mapping is silent
    fn comparable_pair(
        &self,
        actual: &Value,
        operand: &Value,
        property: &str,
    ) -> EvalResult<(Value, Value)> {
        let declared = self
            .mapping
            .column_for(property)
            .and_then(|column| self.mapping.type_of_column(column));
        match declared {
            Some(t) => Ok((coerce(actual, t)?, coerce(operand, t)?)),
            None => Ok((coerce_to_operand(actual, operand)?, operand.clone())),
        }
    }

    fn value_of<'r>(&self, row: &'r Row, property: &str) -> EvalResult<&'r Value> {
        let index = self
            .layout
            .index_of_property(self.mapping, property)
            .ok_or_else(|| EvalError::UnknownProperty {
                property: property.to_string(),
                table: self.mapping.table().to_string(),
            })?;
        Ok(row.get(index))
    }
}

/// Text rendering for LIKE and case-insensitive comparison
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::SortKey;
    use crate::mapping::{TableMapping, ValueType};
    use serde_json::json;

    fn mapping() -> TableMapping {
        TableMapping::new("contact")
            .with_field("name", ValueType::Text)
            .with_field("age", ValueType::Integer)
            .with_field("flags", ValueType::Integer)
    }

    fn row(name: Value, age: Value, flags: Value) -> Row {
        Row::new(vec![name, age, flags])
    }

    fn matches(criteria: &Criteria, r: &Row) -> EvalResult<bool> {
        let m = mapping();
        let layout = RowLayout::from_mapping(&m);
        RowMatcher::new(&m, &layout).matches(r, criteria)
    }

    #[test]
    fn test_empty_criteria_matches_everything() {
        let r = row(json!("Alice"), json!(30), json!(0));
        assert!(matches(&Criteria::all(), &r).unwrap());
        assert!(matches(&Criteria::any(), &r).unwrap());
    }

    #[test]
    fn test_is_null_semantics() {
        let c = Criteria::all().with_predicate(Predicate::equal("name", Value::Null));
        assert!(matches(&c, &row(Value::Null, json!(1), json!(0))).unwrap());
        assert!(!matches(&c, &row(json!("Alice"), json!(1), json!(0))).unwrap());

        let c = Criteria::all()
            .with_predicate(Predicate::equal("name", Value::Null).invert().unwrap());
        assert!(!matches(&c, &row(Value::Null, json!(1), json!(0))).unwrap());
        assert!(matches(&c, &row(json!("Alice"), json!(1), json!(0))).unwrap());
    }

    #[test]
    fn test_null_row_value_never_matches_ranges_either_polarity() {
        let gt = Criteria::all().with_predicate(Predicate::greater("age", json!(5)).unwrap());
        let not_gt = Criteria::all()
            .with_predicate(Predicate::greater("age", json!(5)).unwrap().invert().unwrap());
        let null_row = row(json!("x"), Value::Null, json!(0));

        // NULL > 5 is unknown; so is NOT (NULL > 5)
        assert!(!matches(&gt, &null_row).unwrap());
        assert!(!matches(&not_gt, &null_row).unwrap());
    }

    #[test]
    fn test_between_is_inclusive() {
        let c = Criteria::all()
            .with_predicate(Predicate::between("age", json!(5), json!(10)).unwrap());
        assert!(matches(&c, &row(json!("x"), json!(5), json!(0))).unwrap());
        assert!(matches(&c, &row(json!("x"), json!(10), json!(0))).unwrap());
        assert!(!matches(&c, &row(json!("x"), json!(4), json!(0))).unwrap());
        assert!(!matches(&c, &row(json!("x"), json!(11), json!(0))).unwrap());

        let inv = Criteria::all().with_predicate(
            Predicate::between("age", json!(5), json!(10)).unwrap().invert().unwrap(),
        );
        assert!(!matches(&inv, &row(json!("x"), json!(5), json!(0))).unwrap());
        assert!(!matches(&inv, &row(json!("x"), json!(10), json!(0))).unwrap());
        assert!(matches(&inv, &row(json!("x"), json!(4), json!(0))).unwrap());
    }

    #[test]
    fn test_physical_text_coerces_to_declared_type() {
        // CSV-like store: ages arrive as strings but the mapping says integer
        let c = Criteria::all().with_predicate(Predicate::greater("age", json!(18)).unwrap());
        assert!(matches(&c, &row(json!("x"), json!("21"), json!(0))).unwrap());
        assert!(!matches(&c, &row(json!("x"), json!("15"), json!(0))).unwrap());
    }

    #[test]
    fn test_coercion_failure_is_an_error_not_a_miss() {
        let c = Criteria::all().with_predicate(Predicate::greater("age", json!(18)).unwrap());
        let err = matches(&c, &row(json!("x"), json!("teenage"), json!(0))).unwrap_err();
        assert!(matches!(err, EvalError::Coercion { .. }));
    }

    #[test]
    fn test_like_and_like_insensitive() {
        let c = Criteria::all().with_predicate(Predicate::like("name", "A%e"));
        assert!(matches(&c, &row(json!("Ace"), json!(1), json!(0))).unwrap());
        assert!(!matches(&c, &row(json!("Bob"), json!(1), json!(0))).unwrap());
        assert!(!matches(&c, &row(json!("ace"), json!(1), json!(0))).unwrap());

        let c = Criteria::all().with_predicate(Predicate::like_insensitive("name", "a%e"));
        assert!(matches(&c, &row(json!("Ace"), json!(1), json!(0))).unwrap());
    }

    #[test]
    fn test_equal_insensitive() {
        let c = Criteria::all()
            .with_predicate(Predicate::equal_insensitive("name", json!("SMITH")));
        assert!(matches(&c, &row(json!("smith"), json!(1), json!(0))).unwrap());
        assert!(!matches(&c, &row(json!("smythe"), json!(1), json!(0))).unwrap());
    }

    #[test]
    fn test_bitwise_and_mirrors_compiled_grammar() {
        let c = Criteria::all().with_predicate(Predicate::bitwise_and("flags", 0b100));
        assert!(matches(&c, &row(json!("x"), json!(1), json!(0b110))).unwrap());
        assert!(!matches(&c, &row(json!("x"), json!(1), json!(0b011))).unwrap());

        let inv = Criteria::all()
            .with_predicate(Predicate::bitwise_and("flags", 0b100).invert().unwrap());
        assert!(matches(&inv, &row(json!("x"), json!(1), json!(0b011))).unwrap());
    }

    #[test]
    fn test_in_list_coerces_row_value_toward_candidates() {
        let c = Criteria::all().with_predicate(
            Predicate::in_list("age", vec![json!(1), json!(2), json!(3)]).unwrap(),
        );
        // Row value is text; candidates are numbers: row value moves
        assert!(matches(&c, &row(json!("x"), json!("2"), json!(0))).unwrap());
        assert!(!matches(&c, &row(json!("x"), json!("4"), json!(0))).unwrap());
    }

    #[test]
    fn test_or_combinator_and_nested_groups() {
        let sub = Criteria::any()
            .with_predicate(Predicate::equal("age", json!(1)))
            .with_predicate(Predicate::equal("age", json!(2)));
        let c = Criteria::all()
            .with_predicate(Predicate::like("name", "A%"))
            .with_predicate(Predicate::nested(sub));

        assert!(matches(&c, &row(json!("Alice"), json!(2), json!(0))).unwrap());
        assert!(!matches(&c, &row(json!("Alice"), json!(3), json!(0))).unwrap());
        assert!(!matches(&c, &row(json!("Bob"), json!(2), json!(0))).unwrap());
    }

    #[test]
    fn test_nested_inversion_negates_group_as_unit() {
        let sub = Criteria::any()
            .with_predicate(Predicate::equal("age", json!(1)))
            .with_predicate(Predicate::equal("age", json!(2)));
        let c = Criteria::all()
            .with_predicate(Predicate::nested(sub).invert().unwrap());

        assert!(!matches(&c, &row(json!("x"), json!(1), json!(0))).unwrap());
        assert!(matches(&c, &row(json!("x"), json!(3), json!(0))).unwrap());
    }

    #[test]
    fn test_raw_fragment_unsupported_in_evaluator() {
        let c = Criteria::all().with_predicate(Predicate::raw("x = 1", vec![]));
        let err = matches(&c, &row(json!("x"), json!(1), json!(0))).unwrap_err();
        assert_eq!(
            err,
            EvalError::UnsupportedPredicate {
                predicate: "RawFragment"
            }
        );
    }

    #[test]
    fn test_unknown_property_is_an_error() {
        let c = Criteria::all().with_predicate(Predicate::equal("missing", json!(1)));
        let err = matches(&c, &row(json!("x"), json!(1), json!(0))).unwrap_err();
        assert!(matches!(err, EvalError::UnknownProperty { .. }));
    }

    #[test]
    fn test_sort_keys_do_not_affect_matching() {
        let c = Criteria::all()
            .with_predicate(Predicate::equal("age", json!(1)))
            .with_sort_key(SortKey::ascending("name"));
        assert!(matches(&c, &row(json!("x"), json!(1), json!(0))).unwrap());
    }
}
