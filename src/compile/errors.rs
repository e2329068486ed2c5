//! Compiler error types
//!
//! All raised at compile time with enough context (predicate, property,
//! target) to diagnose without re-running. The compiler never recovers
//! internally.

use thiserror::Error;

/// Result type for SQL compilation
pub type CompileResult<T> = Result<T, CompileError>;

/// Failures lowering a criteria tree to dialect SQL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The mapping has no column for the named property
    #[error("property \"{property}\" has no column mapping on table \"{table}\"")]
    UnknownProperty { property: String, table: String },

    /// Raw SQL text cannot be auto-negated
    #[error("a negated raw SQL fragment cannot be compiled")]
    RawFragmentNegation,

    /// Defensive re-check; construction should already have rejected this
    #[error("IN-list predicate on \"{property}\" reached the compiler with no values")]
    EmptyInList { property: String },

    /// The dialect has no sequence generator support
    #[error("dialect \"{dialect}\" has no sequence support")]
    SequencesUnsupported { dialect: &'static str },
}
