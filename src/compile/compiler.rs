//! Criteria → parameterized SQL lowering
//!
//! Walks the predicate list in order, joining fully parenthesized fragments
//! with the combinator's infix token. Literals never appear in the SQL text;
//! each becomes a placeholder and is pushed onto the positional parameter
//! list at the moment its placeholder is emitted, keeping the two orders
//! identical by construction.

use serde_json::{json, Value};
use tracing::debug;

use crate::expr::{Criteria, Predicate, SortDirection, SortKey};
use crate::mapping::Mapping;

use super::dialect::Dialect;
use super::errors::{CompileError, CompileResult};

/// A compiled statement fragment plus its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFragment {
    pub sql: String,
    pub params: Vec<Value>,
}

impl CompiledFragment {
    pub(crate) fn empty() -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
        }
    }
}

/// Lowers criteria trees for one mapping/dialect pair.
///
/// Column references are table-qualified by default; call [`unqualified`]
/// when compiling for queries that join aliased tables.
///
/// [`unqualified`]: SqlCompiler::unqualified
pub struct SqlCompiler<'a> {
    mapping: &'a dyn Mapping,
    dialect: &'a dyn Dialect,
    qualify: bool,
}

impl<'a> SqlCompiler<'a> {
    pub fn new(mapping: &'a dyn Mapping, dialect: &'a dyn Dialect) -> Self {
        Self {
            mapping,
            dialect,
            qualify: true,
        }
    }

    /// Suppresses table qualification on column references
    pub fn unqualified(mut self) -> Self {
        self.qualify = false;
        self
    }

    /// Compiles the criteria's predicates into a WHERE-clause body.
    ///
    /// An empty predicate list compiles to an empty fragment; the caller
    /// omits the WHERE keyword entirely (the criteria matches every row).
    pub fn where_clause(&self, criteria: &Criteria) -> CompileResult<CompiledFragment> {
        let mut fragment = CompiledFragment::empty();
        self.append_criteria(criteria, &mut fragment.sql, &mut fragment.params)?;
        debug!(
            target: "omniquery::compile",
            sql = %fragment.sql,
            params = fragment.params.len(),
            "compiled where clause"
        );
        Ok(fragment)
    }

    /// Compiles sort keys into an ORDER BY clause, or an empty string when
    /// there are none. `Expression` keys pass through verbatim.
    pub fn order_by_clause(&self, sort_keys: &[SortKey]) -> CompileResult<String> {
        if sort_keys.is_empty() {
            return Ok(String::new());
        }
        let mut parts = Vec::with_capacity(sort_keys.len());
        for key in sort_keys {
            let rendered = match key.direction {
                SortDirection::Expression => key.property.clone(),
                _ => format!("{}{}", self.column_ref(&key.property)?, key.direction.sql_suffix()),
            };
            parts.push(rendered);
        }
        Ok(format!("ORDER BY {}", parts.join(", ")))
    }

    /// Appends a criteria's predicate list to an in-progress statement,
    /// continuing its placeholder numbering. Used by the statement builders
    /// so DML bodies and WHERE clauses share one parameter binder.
    pub(crate) fn append_criteria(
        &self,
        criteria: &Criteria,
        sql: &mut String,
        params: &mut Vec<Value>,
    ) -> CompileResult<()> {
        for (i, predicate) in criteria.predicates.iter().enumerate() {
            if i > 0 {
                sql.push_str(criteria.combinator.sql_infix());
            }
            self.append_predicate(predicate, sql, params)?;
        }
        Ok(())
    }

    /// Emits one self-contained, fully parenthesized predicate fragment
    fn append_predicate(
        &self,
        predicate: &Predicate,
        sql: &mut String,
        params: &mut Vec<Value>,
    ) -> CompileResult<()> {
        match predicate {
            Predicate::Equal {
                property,
                value,
                polarity,
            } => {
                let col = self.column_ref(property)?;
                if value.is_null() {
                    let op = if *polarity { "IS NULL" } else { "IS NOT NULL" };
                    sql.push_str(&format!("({col} {op})"));
                } else {
                    let op = if *polarity { "=" } else { "<>" };
                    let ph = self.bind(value.clone(), params);
                    sql.push_str(&format!("({col} {op} {ph})"));
                }
            }
            Predicate::EqualInsensitive {
                property,
                value,
                polarity,
            } => {
                let col = self.column_ref(property)?;
                if value.is_null() {
                    // Case is meaningless for NULL; same lowering as Equal
                    let op = if *polarity { "IS NULL" } else { "IS NOT NULL" };
                    sql.push_str(&format!("({col} {op})"));
                } else {
                    let lower = self.dialect.lowercase_function();
                    let op = if *polarity { "=" } else { "<>" };
                    let ph = self.bind(value.clone(), params);
                    sql.push_str(&format!("({lower}({col}) {op} {lower}({ph}))"));
                }
            }
            Predicate::Between {
                property,
                min,
                max,
                polarity,
            } => {
                let col = self.column_ref(property)?;
                let op = if *polarity { "BETWEEN" } else { "NOT BETWEEN" };
                let ph_min = self.bind(min.clone(), params);
                let ph_max = self.bind(max.clone(), params);
                sql.push_str(&format!("({col} {op} {ph_min} AND {ph_max})"));
            }
            Predicate::Greater {
                property,
                value,
                polarity,
            } => {
                let col = self.column_ref(property)?;
                let op = if *polarity { ">" } else { "<=" };
                let ph = self.bind(value.clone(), params);
                sql.push_str(&format!("({col} {op} {ph})"));
            }
            Predicate::Lesser {
                property,
                value,
                polarity,
            } => {
                let col = self.column_ref(property)?;
                let op = if *polarity { "<" } else { ">=" };
                let ph = self.bind(value.clone(), params);
                sql.push_str(&format!("({col} {op} {ph})"));
            }
            Predicate::Like {
                property,
                pattern,
                polarity,
            } => {
                let col = self.column_ref(property)?;
                let op = if *polarity { "LIKE" } else { "NOT LIKE" };
                let ph = self.bind(Value::String(pattern.clone()), params);
                sql.push_str(&format!("({col} {op} {ph})"));
            }
            Predicate::LikeInsensitive {
                property,
                pattern,
                polarity,
            } => {
                let col = self.column_ref(property)?;
                let lower = self.dialect.lowercase_function();
                let op = if *polarity { "LIKE" } else { "NOT LIKE" };
                let ph = self.bind(Value::String(pattern.clone()), params);
                sql.push_str(&format!("({lower}({col}) {op} {lower}({ph}))"));
            }
            Predicate::BitwiseAnd {
                property,
                mask,
                polarity,
            } => {
                // Matches when any masked bit is set. Both polarities emit
                // balanced parentheses with the mask as the single parameter.
                let col = self.column_ref(property)?;
                let ph = self.bind(json!(*mask), params);
                let masked = self.dialect.bitand_expr(&col, &ph);
                let op = if *polarity { "<>" } else { "=" };
                sql.push_str(&format!("({masked} {op} 0)"));
            }
            Predicate::InList {
                property,
                values,
                polarity,
            } => {
                if values.is_empty() {
                    return Err(CompileError::EmptyInList {
                        property: property.clone(),
                    });
                }
                let col = self.column_ref(property)?;
                let op = if *polarity { "IN" } else { "NOT IN" };
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|v| self.bind(v.clone(), params))
                    .collect();
                sql.push_str(&format!("({col} {op} ({}))", placeholders.join(", ")));
            }
            Predicate::Nested { criteria, polarity } => {
                // Recurse with the same qualifier context. An empty group
                // matches every row, so its negation matches none.
                let mut inner = String::new();
                self.append_criteria(criteria, &mut inner, params)?;
                if inner.is_empty() {
                    inner = if *polarity { "1 = 1" } else { "1 = 0" }.to_string();
                    sql.push_str(&format!("({inner})"));
                } else if *polarity {
                    sql.push_str(&format!("({inner})"));
                } else {
                    sql.push_str(&format!("(NOT ({inner}))"));
                }
            }
            Predicate::RawFragment {
                sql: raw,
                params: raw_params,
                polarity,
            } => {
                if !*polarity {
                    return Err(CompileError::RawFragmentNegation);
                }
                // Opaque passthrough; the text already carries the dialect's
                // own placeholders
                sql.push_str(&format!("({raw})"));
                params.extend(raw_params.iter().cloned());
            }
        }
        Ok(())
    }

    /// Pushes a parameter and returns its placeholder (1-based ordinal)
    fn bind(&self, value: Value, params: &mut Vec<Value>) -> String {
        params.push(value);
        self.dialect.placeholder(params.len())
    }

    /// Renders a quoted, optionally table-qualified column reference
    pub(crate) fn column_ref(&self, property: &str) -> CompileResult<String> {
        let column = self.mapping.column_for(property).ok_or_else(|| {
            CompileError::UnknownProperty {
                property: property.to_string(),
                table: self.mapping.table().to_string(),
            }
        })?;
        let quoted = self.dialect.quote(column);
        if self.qualify {
            Ok(format!("{}.{}", self.dialect.quote(self.mapping.table()), quoted))
        } else {
            Ok(quoted)
        }
    }
}
