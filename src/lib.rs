//! omniquery - a portable, store-agnostic query layer
//!
//! Application code builds a typed [`expr::Criteria`] once — predicates, sort
//! keys, pagination — and this crate satisfies it against whatever store backs
//! the data:
//!
//! - [`compile`] lowers a criteria tree into a parameterized SQL fragment for
//!   a specific dialect (native stores).
//! - [`eval`] filters and sorts row-by-row, reproducing SQL's null-aware
//!   comparison semantics, for stores with no query capability of their own.
//! - [`join`] emulates inner/left/right/full-outer joins between two
//!   independently queryable sources when no backend can join natively.
//!
//! Physical connections, transactions, and file I/O are deliberately outside
//! this crate; stores appear only through the [`mapping::Mapping`] and
//! [`eval::RowSource`] boundaries.

pub mod compile;
pub mod eval;
pub mod expr;
pub mod join;
pub mod mapping;
