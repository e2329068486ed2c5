//! Pseudo-join execution
//!
//! The planner sits above two query paths and recombines their outputs. It
//! owns no I/O: both sides appear as [`RowSource`] cursors.

use std::cmp::Ordering;

use serde_json::Value;
use tracing::warn;

use crate::eval::{
    coerce, coerce_to_operand, compare_nullable, compare_values, EvalError, RowSource,
};
use crate::expr::{
    Combinator, Criteria, JoinCriteria, JoinOp, JoinPredicate, JoinType, Predicate, SortDirection,
};
use crate::mapping::{Row, ValueType};

use super::errors::{JoinError, JoinResult};

/// One joined result: a row from each side, either of which may be null for
/// outer joins
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedPair {
    pub left: Option<Row>,
    pub right: Option<Row>,
}

impl JoinedPair {
    fn new(left: Option<Row>, right: Option<Row>) -> Self {
        Self { left, right }
    }

    fn flipped(self) -> Self {
        Self {
            left: self.right,
            right: self.left,
        }
    }
}

/// Computes pseudo-joins between two independently queryable sources
pub struct JoinPlanner;

impl JoinPlanner {
    /// Runs the join, then sorts and paginates the complete result.
    ///
    /// Pagination is strictly post-join and post-sort; it is never pushed
    /// into either per-source query, since the join may expand or contract
    /// row counts unpredictably.
    pub fn join(
        criteria: &JoinCriteria,
        left: &dyn RowSource,
        right: &dyn RowSource,
    ) -> JoinResult<Vec<JoinedPair>> {
        let mut pairs = match criteria.join_type {
            JoinType::Inner => Self::nested_loop(criteria, left, right, false)?,
            JoinType::LeftOuter => Self::nested_loop(criteria, left, right, true)?,
            JoinType::RightOuter => {
                // Flip the roles, run left-outer, flip each pair back.
                // Right-outer never gets independent logic of its own.
                let flipped = JoinCriteria {
                    left: criteria.right.clone(),
                    right: criteria.left.clone(),
                    predicates: criteria.predicates.iter().map(JoinPredicate::reversed).collect(),
                    join_type: JoinType::LeftOuter,
                    sort_keys: Vec::new(),
                    offset: None,
                    limit: None,
                };
                Self::nested_loop(&flipped, right, left, true)?
                    .into_iter()
                    .map(JoinedPair::flipped)
                    .collect()
            }
            JoinType::FullOuter => Self::full_outer(criteria, left, right)?,
        };

        if !criteria.sort_keys.is_empty() {
            Self::sort_pairs(&mut pairs, criteria, left, right)?;
        }

        let offset = criteria.offset.unwrap_or(0) as usize;
        let limit = criteria.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(pairs.into_iter().skip(offset).take(limit).collect())
    }

    /// Inner and left-outer: one left query, one derived right query per
    /// left row
    fn nested_loop(
        criteria: &JoinCriteria,
        left: &dyn RowSource,
        right: &dyn RowSource,
        emit_unmatched_left: bool,
    ) -> JoinResult<Vec<JoinedPair>> {
        // Right-side properties are still late-bound (join construction
        // accepts anything), but they must resolve before the derived
        // queries start reading rows
        for jp in &criteria.predicates {
            if right
                .layout()
                .index_of_property(right.mapping(), &jp.right_property)
                .is_none()
            {
                return Err(JoinError::Binding {
                    property: jp.right_property.clone(),
                    side: "right",
                });
            }
        }

        let mut pairs = Vec::new();
        for left_row in left.execute(&criteria.left)? {
            let left_row = left_row?;
            let derived = Self::derive_right_criteria(criteria, &left_row, left)?;
            let matches = match derived {
                Some(right_criteria) => right.query(&right_criteria)?,
                // A null bound on an order comparison can never match
                None => Vec::new(),
            };
            if matches.is_empty() {
                if emit_unmatched_left {
                    pairs.push(JoinedPair::new(Some(left_row), None));
                }
                continue;
            }
            for right_row in matches {
                pairs.push(JoinedPair::new(Some(left_row.clone()), Some(right_row)));
            }
        }
        Ok(pairs)
    }

    /// Rewrites each join predicate into an ordinary literal predicate bound
    /// to this left row's value, merged with the right-side criteria.
    ///
    /// Returns `None` when a null bound makes the derived query
    /// unsatisfiable: a null key never joins, for any operator. Translating
    /// a null `Equal` bound into IS NULL would pair null keys with null
    /// keys, which the full-outer comparison (`pair_satisfies`) rejects.
    fn derive_right_criteria(
        criteria: &JoinCriteria,
        left_row: &Row,
        left: &dyn RowSource,
    ) -> JoinResult<Option<Criteria>> {
        let mut derived = Criteria {
            combinator: Combinator::And,
            predicates: Vec::new(),
            sort_keys: criteria.right.sort_keys.clone(),
            offset: criteria.right.offset,
            limit: criteria.right.limit,
        };

        for jp in &criteria.predicates {
            let value = Self::bind(left_row, left, &jp.left_property, "left")?;
            if value.is_null() {
                return Ok(None);
            }
            let bound = match jp.op {
                JoinOp::Equal => Predicate::Equal {
                    property: jp.right_property.clone(),
                    value,
                    polarity: jp.polarity,
                },
                // The comparison direction flips when the left value moves
                // to the literal side: left > right becomes right < value
                JoinOp::Greater => Predicate::Lesser {
                    property: jp.right_property.clone(),
                    value,
                    polarity: jp.polarity,
                },
                JoinOp::Lesser => Predicate::Greater {
                    property: jp.right_property.clone(),
                    value,
                    polarity: jp.polarity,
                },
            };
            derived.predicates.push(bound);
        }

        if !criteria.right.predicates.is_empty() {
            derived.predicates.push(Predicate::Nested {
                criteria: Box::new(criteria.right.clone()),
                polarity: true,
            });
        }
        Ok(Some(derived))
    }

    /// Full-outer: both sides materialized, every pair compared
    fn full_outer(
        criteria: &JoinCriteria,
        left: &dyn RowSource,
        right: &dyn RowSource,
    ) -> JoinResult<Vec<JoinedPair>> {
        let left_rows = left.query(&criteria.left)?;
        let right_rows = right.query(&criteria.right)?;

        // Documented performance cliff, not an oversight: no per-row
        // round trips exist for full-outer, so the planner cross-compares
        // everything.
        warn!(
            target: "omniquery::join",
            left = left_rows.len(),
            right = right_rows.len(),
            comparisons = left_rows.len() * right_rows.len() * criteria.predicates.len(),
            "full outer join requires a complete cross comparison"
        );

        let mut pairs = Vec::new();
        let mut left_matched = vec![false; left_rows.len()];
        let mut right_matched = vec![false; right_rows.len()];

        for (i, left_row) in left_rows.iter().enumerate() {
            for (j, right_row) in right_rows.iter().enumerate() {
                let mut all = true;
                for jp in &criteria.predicates {
                    if !Self::pair_satisfies(jp, left_row, left, right_row, right)? {
                        all = false;
                        break;
                    }
                }
                if all {
                    pairs.push(JoinedPair::new(
                        Some(left_row.clone()),
                        Some(right_row.clone()),
                    ));
                    left_matched[i] = true;
                    right_matched[j] = true;
                }
            }
        }

        for (i, left_row) in left_rows.iter().enumerate() {
            if !left_matched[i] {
                pairs.push(JoinedPair::new(Some(left_row.clone()), None));
            }
        }
        for (j, right_row) in right_rows.iter().enumerate() {
            if !right_matched[j] {
                pairs.push(JoinedPair::new(None, Some(right_row.clone())));
            }
        }
        Ok(pairs)
    }

    /// Evaluates one join predicate against a concrete left/right row pair.
    /// Null on either side never satisfies the predicate, for either
    /// polarity.
    fn pair_satisfies(
        jp: &JoinPredicate,
        left_row: &Row,
        left: &dyn RowSource,
        right_row: &Row,
        right: &dyn RowSource,
    ) -> JoinResult<bool> {
        let left_value = Self::bind(left_row, left, &jp.left_property, "left")?;
        let right_value = Self::bind(right_row, right, &jp.right_property, "right")?;
        if left_value.is_null() || right_value.is_null() {
            return Ok(false);
        }
        let comparable = coerce_to_operand(&right_value, &left_value).map_err(JoinError::Eval)?;
        let ordering = compare_values(&left_value, &comparable);
        let satisfied = match jp.op {
            JoinOp::Equal => ordering == Ordering::Equal,
            JoinOp::Greater => ordering == Ordering::Greater,
            JoinOp::Lesser => ordering == Ordering::Less,
        };
        Ok(satisfied == jp.polarity)
    }

    /// Late-bound property read; absence raises, it never reads as null
    fn bind(
        row: &Row,
        source: &dyn RowSource,
        property: &str,
        side: &'static str,
    ) -> JoinResult<Value> {
        let index = source
            .layout()
            .index_of_property(source.mapping(), property)
            .ok_or_else(|| JoinError::Binding {
                property: property.to_string(),
                side,
            })?;
        Ok(row.get(index).clone())
    }

    /// Post-join sort with the evaluator's null-last multi-key comparator,
    /// keyed off whichever side each sort key names
    fn sort_pairs(
        pairs: &mut Vec<JoinedPair>,
        criteria: &JoinCriteria,
        left: &dyn RowSource,
        right: &dyn RowSource,
    ) -> JoinResult<()> {
        struct PreparedKey {
            from_left: bool,
            index: usize,
            value_type: Option<ValueType>,
            descending: bool,
        }

        let mut keys = Vec::with_capacity(criteria.sort_keys.len());
        for key in &criteria.sort_keys {
            if key.direction == SortDirection::Expression {
                return Err(JoinError::Eval(EvalError::ComputedSortExpression {
                    expression: key.property.clone(),
                }));
            }
            let prepared = if let Some(index) =
                left.layout().index_of_property(left.mapping(), &key.property)
            {
                let column = left.mapping().column_for(&key.property).unwrap_or_default();
                PreparedKey {
                    from_left: true,
                    index,
                    value_type: left.mapping().type_of_column(column),
                    descending: key.direction == SortDirection::Descending,
                }
            } else if let Some(index) =
                right.layout().index_of_property(right.mapping(), &key.property)
            {
                let column = right.mapping().column_for(&key.property).unwrap_or_default();
                PreparedKey {
                    from_left: false,
                    index,
                    value_type: right.mapping().type_of_column(column),
                    descending: key.direction == SortDirection::Descending,
                }
            } else {
                return Err(JoinError::UnknownSortProperty {
                    property: key.property.clone(),
                });
            };
            keys.push(prepared);
        }

        // Decorate with coerced key values so coercion failures surface
        // before the sort rearranges anything
        let mut decorated: Vec<(Vec<Value>, JoinedPair)> = Vec::with_capacity(pairs.len());
        for pair in pairs.drain(..) {
            let mut key_values = Vec::with_capacity(keys.len());
            for key in &keys {
                let side = if key.from_left { &pair.left } else { &pair.right };
                let raw = match side {
                    Some(row) => row.get(key.index).clone(),
                    // Outer-join null sides sort like null values: last
                    None => Value::Null,
                };
                let value = match key.value_type {
                    Some(t) => coerce(&raw, t).map_err(JoinError::Eval)?,
                    None => raw,
                };
                key_values.push(value);
            }
            decorated.push((key_values, pair));
        }

        decorated.sort_by(|a, b| {
            for (key, (av, bv)) in keys.iter().zip(a.0.iter().zip(b.0.iter())) {
                let ordering = compare_nullable(av, bv, key.descending);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        pairs.extend(decorated.into_iter().map(|(_, pair)| pair));
        Ok(())
    }
}
