//! Sort keys for criteria and join criteria

use serde::{Deserialize, Serialize};

/// Sort direction for one key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
    /// The key is a computed dialect expression sorted in its natural order;
    /// no direction token is emitted and the text is passed through verbatim
    Expression,
}

impl SortDirection {
    /// SQL suffix for this direction (empty for computed expressions)
    pub fn sql_suffix(&self) -> &'static str {
        match self {
            SortDirection::Ascending => " ASC",
            SortDirection::Descending => " DESC",
            SortDirection::Expression => "",
        }
    }
}

/// One sort key: a property name (or computed expression) plus direction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub property: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: SortDirection::Descending,
        }
    }

    /// A computed expression ordered naturally, e.g. `"LENGTH(surname)"`
    pub fn expression(text: impl Into<String>) -> Self {
        Self {
            property: text.into(),
            direction: SortDirection::Expression,
        }
    }
}
