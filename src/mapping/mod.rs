//! Mapping metadata: the property ↔ column boundary
//!
//! The core never builds object-to-row metadata itself; it consumes it
//! through the [`Mapping`] trait, resolved once per query — never per row.
//! [`TableMapping`] is the in-crate implementation used by in-memory stores
//! and tests; ORM-style callers supply their own.

mod row;
mod table;

pub use row::{Row, RowLayout};
pub use table::TableMapping;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical value type of a column, driving coercion before comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Bool,
    Integer,
    Float,
    Text,
    /// RFC 3339 text or epoch milliseconds; normalized to epoch milliseconds
    /// for comparison
    Timestamp,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Text => "text",
            ValueType::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-record-type metadata consumed opaquely by the compiler and evaluator
pub trait Mapping {
    /// Qualifying table (or identifier) name
    fn table(&self) -> &str;

    /// Physical column for a logical property, if mapped
    fn column_for(&self, property: &str) -> Option<&str>;

    /// Declared value type of a column, if known; comparisons fall back to
    /// the operand's runtime type when the mapping is silent
    fn type_of_column(&self, column: &str) -> Option<ValueType>;

    /// All columns in stable declaration order, defining the row shape
    fn columns(&self) -> &[String];
}
