//! Evaluator error types
//!
//! Every error carries the context needed to diagnose without re-running the
//! query: the target type and offending value for coercions, the property and
//! table for mapping misses. The evaluator never recovers internally.

use thiserror::Error;

use crate::mapping::ValueType;

/// Result type for row evaluation
pub type EvalResult<T> = Result<T, EvalError>;

/// Failures while matching or ordering rows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A value could not be converted to the required comparison type.
    /// Never treated as "no match" — a silent failure here would corrupt
    /// filtering results.
    #[error("cannot coerce {value} to {target}")]
    Coercion { target: ValueType, value: String },

    /// The mapping has no column for the named property
    #[error("property \"{property}\" has no column mapping on table \"{table}\"")]
    UnknownProperty { property: String, table: String },

    /// The predicate type has no row-at-a-time evaluation
    #[error("the row evaluator cannot apply a {predicate} predicate")]
    UnsupportedPredicate { predicate: &'static str },

    /// LIKE pattern failed to translate to a matcher
    #[error("invalid LIKE pattern \"{pattern}\": {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Computed sort expressions only exist in SQL; they cannot be ordered
    /// in memory
    #[error("computed sort expressions cannot be ordered in memory: \"{expression}\"")]
    ComputedSortExpression { expression: String },
}
