//! Join criteria: a query description spanning two sources
//!
//! A [`JoinPredicate`] compares a property from the left row against a
//! property from the right row — not against a literal. The join planner
//! binds literals per row at execution time.

use serde::{Deserialize, Serialize};

use super::criteria::Criteria;
use super::sort::SortKey;

/// Relational join flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
}

/// Comparison between the two sides of a join predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinOp {
    Equal,
    Greater,
    Lesser,
}

impl JoinOp {
    /// The operator seen from the opposite side: `left > right` read from the
    /// right side is `right < left`. Used when a left-row value becomes the
    /// literal in a derived right-side predicate, and when flipping a
    /// right-outer join into a left-outer one.
    pub fn flipped(&self) -> Self {
        match self {
            JoinOp::Equal => JoinOp::Equal,
            JoinOp::Greater => JoinOp::Lesser,
            JoinOp::Lesser => JoinOp::Greater,
        }
    }
}

/// One cross-source comparison
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinPredicate {
    pub left_property: String,
    pub right_property: String,
    pub op: JoinOp,
    pub polarity: bool,
}

impl JoinPredicate {
    pub fn equal(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::new(left, right, JoinOp::Equal)
    }

    pub fn greater(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::new(left, right, JoinOp::Greater)
    }

    pub fn lesser(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::new(left, right, JoinOp::Lesser)
    }

    fn new(left: impl Into<String>, right: impl Into<String>, op: JoinOp) -> Self {
        Self {
            left_property: left.into(),
            right_property: right.into(),
            op,
            polarity: true,
        }
    }

    /// Same predicate read from the other side of the join
    pub fn reversed(&self) -> Self {
        Self {
            left_property: self.right_property.clone(),
            right_property: self.left_property.clone(),
            op: self.op.flipped(),
            polarity: self.polarity,
        }
    }
}

/// Everything the join planner needs: per-side criteria, the cross-source
/// predicates, and post-join sort/pagination.
///
/// `sort_keys`, `offset`, and `limit` apply to the joined result, never to
/// either per-source query — the join may expand or contract row counts
/// unpredictably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinCriteria {
    pub left: Criteria,
    pub right: Criteria,
    pub predicates: Vec<JoinPredicate>,
    pub join_type: JoinType,
    pub sort_keys: Vec<SortKey>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl JoinCriteria {
    pub fn new(join_type: JoinType, left: Criteria, right: Criteria) -> Self {
        Self {
            left,
            right,
            predicates: Vec::new(),
            join_type,
            sort_keys: Vec::new(),
            offset: None,
            limit: None,
        }
    }

    /// Appends a cross-source predicate
    pub fn with_predicate(mut self, predicate: JoinPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Appends a post-join sort key; the property may name either side
    pub fn with_sort_key(mut self, key: SortKey) -> Self {
        self.sort_keys.push(key);
        self
    }

    /// Sets the post-join, post-sort pagination offset
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the post-join, post-sort pagination limit
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_op_flips() {
        assert_eq!(JoinOp::Equal.flipped(), JoinOp::Equal);
        assert_eq!(JoinOp::Greater.flipped(), JoinOp::Lesser);
        assert_eq!(JoinOp::Lesser.flipped(), JoinOp::Greater);
    }

    #[test]
    fn test_reversed_swaps_sides_and_operator() {
        let p = JoinPredicate::greater("l.age", "r.age");
        let r = p.reversed();
        assert_eq!(r.left_property, "r.age");
        assert_eq!(r.right_property, "l.age");
        assert_eq!(r.op, JoinOp::Lesser);
        // Reversing twice restores the original
        assert_eq!(r.reversed(), p);
    }
}
