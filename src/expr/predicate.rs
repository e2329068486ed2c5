//! Predicate variants for the expression model
//!
//! A closed set: both the SQL compiler and the row evaluator match
//! exhaustively over these variants, so adding one is a compile-time-enforced
//! update to every consumer.
//!
//! Every variant carries a `polarity` flag — `true` means "matches", `false`
//! means "does not match" — so any predicate can be logically negated without
//! rewriting the tree.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::criteria::Criteria;
use super::errors::{ConstructionError, ExprResult};

/// One typed condition over a single property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// property = value; a null value tests IS NULL
    Equal {
        property: String,
        value: Value,
        polarity: bool,
    },
    /// Case-insensitive equality; a null value tests IS NULL
    EqualInsensitive {
        property: String,
        value: Value,
        polarity: bool,
    },
    /// min <= property <= max, inclusive on both ends
    Between {
        property: String,
        min: Value,
        max: Value,
        polarity: bool,
    },
    /// property > value
    Greater {
        property: String,
        value: Value,
        polarity: bool,
    },
    /// property < value
    Lesser {
        property: String,
        value: Value,
        polarity: bool,
    },
    /// SQL LIKE with `%` / `_` wildcards
    Like {
        property: String,
        pattern: String,
        polarity: bool,
    },
    /// Case-insensitive LIKE
    LikeInsensitive {
        property: String,
        pattern: String,
        polarity: bool,
    },
    /// Any bit of `mask` set in the property value
    BitwiseAnd {
        property: String,
        mask: i64,
        polarity: bool,
    },
    /// Membership in a non-empty, null-free value set
    InList {
        property: String,
        values: Vec<Value>,
        polarity: bool,
    },
    /// Logical grouping of a sub-criteria
    Nested {
        criteria: Box<Criteria>,
        polarity: bool,
    },
    /// Opaque, one-directional injection of dialect SQL text with its own
    /// positional parameters; never parsed back into the model
    RawFragment {
        sql: String,
        params: Vec<Value>,
        polarity: bool,
    },
}

impl Predicate {
    /// Equality test; `value` may be null (IS NULL)
    pub fn equal(property: impl Into<String>, value: Value) -> Self {
        Predicate::Equal {
            property: property.into(),
            value,
            polarity: true,
        }
    }

    /// Case-insensitive equality test; `value` may be null (IS NULL)
    pub fn equal_insensitive(property: impl Into<String>, value: Value) -> Self {
        Predicate::EqualInsensitive {
            property: property.into(),
            value,
            polarity: true,
        }
    }

    /// Inclusive range test; both bounds must be non-null
    pub fn between(property: impl Into<String>, min: Value, max: Value) -> ExprResult<Self> {
        let property = property.into();
        if min.is_null() || max.is_null() {
            return Err(ConstructionError::NullOperand {
                predicate: "Between",
                property,
            });
        }
        Ok(Predicate::Between {
            property,
            min,
            max,
            polarity: true,
        })
    }

    /// Strictly-greater test; `value` must be non-null
    pub fn greater(property: impl Into<String>, value: Value) -> ExprResult<Self> {
        let property = property.into();
        if value.is_null() {
            return Err(ConstructionError::NullOperand {
                predicate: "Greater",
                property,
            });
        }
        Ok(Predicate::Greater {
            property,
            value,
            polarity: true,
        })
    }

    /// Strictly-lesser test; `value` must be non-null
    pub fn lesser(property: impl Into<String>, value: Value) -> ExprResult<Self> {
        let property = property.into();
        if value.is_null() {
            return Err(ConstructionError::NullOperand {
                predicate: "Lesser",
                property,
            });
        }
        Ok(Predicate::Lesser {
            property,
            value,
            polarity: true,
        })
    }

    /// LIKE test with SQL wildcards (`%`, `_`)
    pub fn like(property: impl Into<String>, pattern: impl Into<String>) -> Self {
        Predicate::Like {
            property: property.into(),
            pattern: pattern.into(),
            polarity: true,
        }
    }

    /// Case-insensitive LIKE test
    pub fn like_insensitive(property: impl Into<String>, pattern: impl Into<String>) -> Self {
        Predicate::LikeInsensitive {
            property: property.into(),
            pattern: pattern.into(),
            polarity: true,
        }
    }

    /// Bit-mask test: matches when any bit of `mask` is set in the value
    pub fn bitwise_and(property: impl Into<String>, mask: i64) -> Self {
        Predicate::BitwiseAnd {
            property: property.into(),
            mask,
            polarity: true,
        }
    }

    /// Membership test; `values` must be non-empty and null-free
    pub fn in_list(property: impl Into<String>, values: Vec<Value>) -> ExprResult<Self> {
        let property = property.into();
        if values.is_empty() {
            return Err(ConstructionError::EmptyInList { property });
        }
        if values.iter().any(Value::is_null) {
            return Err(ConstructionError::NullInListEntry { property });
        }
        Ok(Predicate::InList {
            property,
            values,
            polarity: true,
        })
    }

    /// Logical grouping of a sub-criteria
    pub fn nested(criteria: Criteria) -> Self {
        Predicate::Nested {
            criteria: Box::new(criteria),
            polarity: true,
        }
    }

    /// Raw dialect SQL with its own positional parameters
    pub fn raw(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Predicate::RawFragment {
            sql: sql.into(),
            params,
            polarity: true,
        }
    }

    /// Returns the variant name, for diagnostics and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Predicate::Equal { .. } => "Equal",
            Predicate::EqualInsensitive { .. } => "EqualInsensitive",
            Predicate::Between { .. } => "Between",
            Predicate::Greater { .. } => "Greater",
            Predicate::Lesser { .. } => "Lesser",
            Predicate::Like { .. } => "Like",
            Predicate::LikeInsensitive { .. } => "LikeInsensitive",
            Predicate::BitwiseAnd { .. } => "BitwiseAnd",
            Predicate::InList { .. } => "InList",
            Predicate::Nested { .. } => "Nested",
            Predicate::RawFragment { .. } => "RawFragment",
        }
    }

    /// Returns the property this predicate constrains, if it names one
    pub fn property(&self) -> Option<&str> {
        match self {
            Predicate::Equal { property, .. }
            | Predicate::EqualInsensitive { property, .. }
            | Predicate::Between { property, .. }
            | Predicate::Greater { property, .. }
            | Predicate::Lesser { property, .. }
            | Predicate::Like { property, .. }
            | Predicate::LikeInsensitive { property, .. }
            | Predicate::BitwiseAnd { property, .. }
            | Predicate::InList { property, .. } => Some(property),
            Predicate::Nested { .. } | Predicate::RawFragment { .. } => None,
        }
    }

    /// Returns the polarity flag: `true` = "matches", `false` = "does not match"
    pub fn polarity(&self) -> bool {
        match self {
            Predicate::Equal { polarity, .. }
            | Predicate::EqualInsensitive { polarity, .. }
            | Predicate::Between { polarity, .. }
            | Predicate::Greater { polarity, .. }
            | Predicate::Lesser { polarity, .. }
            | Predicate::Like { polarity, .. }
            | Predicate::LikeInsensitive { polarity, .. }
            | Predicate::BitwiseAnd { polarity, .. }
            | Predicate::InList { polarity, .. }
            | Predicate::Nested { polarity, .. }
            | Predicate::RawFragment { polarity, .. } => *polarity,
        }
    }

    /// Returns a new predicate matching exactly the complement set.
    ///
    /// Inversion flips the node's own polarity and nothing else. In
    /// particular, inverting a `Nested` group does NOT apply De Morgan's law
    /// to the sub-criteria — the group is negated as a unit. This is intended
    /// behavior, not a shortcut.
    ///
    /// `RawFragment` cannot be inverted: arbitrary SQL text cannot be safely
    /// negated.
    pub fn invert(&self) -> ExprResult<Self> {
        if matches!(self, Predicate::RawFragment { .. }) {
            return Err(ConstructionError::RawFragmentInversion);
        }
        let mut inverted = self.clone();
        match &mut inverted {
            Predicate::Equal { polarity, .. }
            | Predicate::EqualInsensitive { polarity, .. }
            | Predicate::Between { polarity, .. }
            | Predicate::Greater { polarity, .. }
            | Predicate::Lesser { polarity, .. }
            | Predicate::Like { polarity, .. }
            | Predicate::LikeInsensitive { polarity, .. }
            | Predicate::BitwiseAnd { polarity, .. }
            | Predicate::InList { polarity, .. }
            | Predicate::Nested { polarity, .. } => *polarity = !*polarity,
            Predicate::RawFragment { .. } => unreachable!("rejected above"),
        }
        Ok(inverted)
    }
}
