//! Expression model for omniquery
//!
//! Pure data: no I/O, no store knowledge. A [`Criteria`] is the complete
//! description of one query — a boolean combinator, an ordered predicate
//! list, ordered sort keys, and pagination bounds. Consumers (the SQL
//! compiler, the row evaluator, the join planner) borrow criteria trees and
//! never mutate them.
//!
//! # Invariants
//!
//! - An empty predicate list matches every row.
//! - Null operands are legal only on equality predicates (IS NULL tests).
//! - `InList` value sets are non-empty and null-free, enforced at
//!   construction.
//! - `invert()` is a pure transformation returning a new node; criteria
//!   trees stay safely shareable.

mod criteria;
mod errors;
mod join;
mod predicate;
mod sort;

pub use criteria::{Combinator, Criteria};
pub use errors::{ConstructionError, ExprResult};
pub use join::{JoinCriteria, JoinOp, JoinPredicate, JoinType};
pub use predicate::Predicate;
pub use sort::{SortDirection, SortKey};
