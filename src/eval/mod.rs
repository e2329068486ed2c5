//! Row evaluation subsystem
//!
//! For stores with no native predicate pushdown: decides per row whether a
//! criteria matches, and orders rows for criteria with sort keys. The
//! matching rules reproduce SQL's three-valued comparison semantics, not
//! general-purpose truthy/falsy logic:
//!
//! - A null-operand equality is an IS NULL test.
//! - Range comparisons touching null never match, for either polarity.
//! - Coercion failures raise, never silently read as "no match".
//!
//! Sorting fully materializes matching rows; unsorted evaluation streams
//! one row at a time (see [`MemorySource`]).

mod coerce;
mod errors;
mod like;
mod matcher;
mod sorter;
mod source;

pub use coerce::{coerce, coerce_to_operand, runtime_type};
pub use errors::{EvalError, EvalResult};
pub use like::like_regex;
pub use matcher::RowMatcher;
pub use sorter::RowComparator;
pub(crate) use sorter::{compare_nullable, compare_values};
pub use source::{MemorySource, RowCursor, RowSource};
