//! Join planner error types
//!
//! Binding failures are late by design: a join predicate naming a property
//! absent from a produced row raises at evaluation time, not at
//! join-construction time, mirroring how the compiler defers per-row
//! literal binding.

use thiserror::Error;

use crate::eval::EvalError;

/// Result type for join planning
pub type JoinResult<T> = Result<T, JoinError>;

/// Failures while executing a pseudo-join
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// A join predicate references a property the side's rows do not carry
    #[error("join predicate references \"{property}\" which is absent from the {side} row")]
    Binding { property: String, side: &'static str },

    /// A post-join sort key names a property on neither side
    #[error("sort key \"{property}\" matches neither join side")]
    UnknownSortProperty { property: String },

    /// Underlying evaluation failure on either side
    #[error(transparent)]
    Eval(#[from] EvalError),
}
