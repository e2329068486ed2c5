//! Cross-store join planning
//!
//! Emulates relational joins between two independently queryable sources
//! when neither backend (nor any bridge between them) can join natively.
//!
//! # Algorithms
//!
//! - Inner / left-outer: one left query, then one derived right query per
//!   left row with the join predicates bound to that row's values.
//! - Right-outer: the left-outer algorithm with the sides flipped, results
//!   flipped back. Never an independent implementation.
//! - Full-outer: both sides fully materialized and cross-compared,
//!   O(L x R x J); a warning-level diagnostic reports the cost up front.
//!
//! Sorting and pagination always apply to the joined result, never to the
//! per-source queries.

mod errors;
mod planner;

pub use errors::{JoinError, JoinResult};
pub use planner::{JoinPlanner, JoinedPair};
