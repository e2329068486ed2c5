//! Expression model error types
//!
//! Construction errors are raised synchronously at the call that built the
//! offending node, never deferred to compile or evaluation time.

use thiserror::Error;

/// Result type for expression construction
pub type ExprResult<T> = Result<T, ConstructionError>;

/// Invalid predicate arguments, rejected at construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// Null operand on a predicate that cannot express IS NULL
    #[error("{predicate} predicate on \"{property}\" requires a non-null operand")]
    NullOperand {
        predicate: &'static str,
        property: String,
    },

    /// Empty IN-list value set; "filter on nothing" must be special-cased
    /// by the caller, it is not a "no rows" query
    #[error("IN-list predicate on \"{property}\" requires a non-empty value set")]
    EmptyInList { property: String },

    /// Null entry inside an IN-list value set
    #[error("IN-list predicate on \"{property}\" rejects null entries")]
    NullInListEntry { property: String },

    /// Raw SQL fragments are opaque text and cannot be safely negated
    #[error("a raw SQL fragment cannot be inverted")]
    RawFragmentInversion,
}
