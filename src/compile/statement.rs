//! DML statement builders
//!
//! INSERT/UPDATE/DELETE bodies flow through the same positional parameter
//! binder as WHERE clauses: a single parameter list per statement, appended
//! in emission order. Column references in DML are never table-qualified.

use serde_json::Value;

use crate::expr::Criteria;
use crate::mapping::Mapping;

use super::compiler::{CompiledFragment, SqlCompiler};
use super::dialect::Dialect;
use super::errors::{CompileError, CompileResult};

/// Builds full DML statements for one mapping/dialect pair
pub struct StatementBuilder<'a> {
    mapping: &'a dyn Mapping,
    dialect: &'a dyn Dialect,
}

impl<'a> StatementBuilder<'a> {
    pub fn new(mapping: &'a dyn Mapping, dialect: &'a dyn Dialect) -> Self {
        Self { mapping, dialect }
    }

    /// `INSERT INTO table (cols...) VALUES (placeholders...)`
    pub fn insert(&self, values: &[(&str, Value)]) -> CompileResult<CompiledFragment> {
        let mut columns = Vec::with_capacity(values.len());
        let mut placeholders = Vec::with_capacity(values.len());
        let mut params = Vec::with_capacity(values.len());
        for (property, value) in values {
            columns.push(self.column(property)?);
            params.push(value.clone());
            placeholders.push(self.dialect.placeholder(params.len()));
        }
        Ok(CompiledFragment {
            sql: format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.dialect.quote(self.mapping.table()),
                columns.join(", "),
                placeholders.join(", ")
            ),
            params,
        })
    }

    /// `UPDATE table SET ... WHERE ...`; SET parameters precede WHERE
    /// parameters in the shared positional list
    pub fn update(
        &self,
        assignments: &[(&str, Value)],
        criteria: &Criteria,
    ) -> CompileResult<CompiledFragment> {
        let mut params = Vec::with_capacity(assignments.len());
        let mut sets = Vec::with_capacity(assignments.len());
        for (property, value) in assignments {
            let column = self.column(property)?;
            params.push(value.clone());
            sets.push(format!("{column} = {}", self.dialect.placeholder(params.len())));
        }
        let mut sql = format!(
            "UPDATE {} SET {}",
            self.dialect.quote(self.mapping.table()),
            sets.join(", ")
        );
        self.append_where(criteria, &mut sql, &mut params)?;
        Ok(CompiledFragment { sql, params })
    }

    /// `DELETE FROM table WHERE ...`
    pub fn delete(&self, criteria: &Criteria) -> CompileResult<CompiledFragment> {
        let mut sql = format!("DELETE FROM {}", self.dialect.quote(self.mapping.table()));
        let mut params = Vec::new();
        self.append_where(criteria, &mut sql, &mut params)?;
        Ok(CompiledFragment { sql, params })
    }

    /// `TRUNCATE TABLE table`, or an unconditional DELETE when the dialect
    /// has no TRUNCATE
    pub fn truncate(&self) -> String {
        let table = self.dialect.quote(self.mapping.table());
        if self.dialect.supports_truncate() {
            format!("TRUNCATE TABLE {table}")
        } else {
            format!("DELETE FROM {table}")
        }
    }

    /// Query text yielding the next value of a named sequence
    pub fn next_sequence_value(&self, sequence: &str) -> CompileResult<String> {
        self.dialect
            .next_sequence_value(sequence)
            .ok_or(CompileError::SequencesUnsupported {
                dialect: self.dialect.name(),
            })
    }

    fn append_where(
        &self,
        criteria: &Criteria,
        sql: &mut String,
        params: &mut Vec<Value>,
    ) -> CompileResult<()> {
        if criteria.is_unfiltered() {
            return Ok(());
        }
        sql.push_str(" WHERE ");
        // Placeholder numbering continues from the DML body's parameters
        SqlCompiler::new(self.mapping, self.dialect)
            .unqualified()
            .append_criteria(criteria, sql, params)
    }

    fn column(&self, property: &str) -> CompileResult<String> {
        let column = self.mapping.column_for(property).ok_or_else(|| {
            CompileError::UnknownProperty {
                property: property.to_string(),
                table: self.mapping.table().to_string(),
            }
        })?;
        Ok(self.dialect.quote(column))
    }
}
