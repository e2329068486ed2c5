//! Row shape: ordered column values plus a per-query index table
//!
//! A [`RowLayout`] is built once per query from the mapping's column list;
//! rows are then plain value arrays with no per-row name lookups.

use std::collections::HashMap;

use serde_json::Value;

use super::Mapping;

/// Stable column → index table, built once per query
#[derive(Debug, Clone)]
pub struct RowLayout {
    columns: Vec<String>,
    index_by_column: HashMap<String, usize>,
}

impl RowLayout {
    /// Builds the layout from the mapping's ordered column list
    pub fn from_mapping(mapping: &dyn Mapping) -> Self {
        let columns: Vec<String> = mapping.columns().to_vec();
        let index_by_column = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self {
            columns,
            index_by_column,
        }
    }

    /// Index of a physical column within the row array
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.index_by_column.get(column).copied()
    }

    /// Index of a logical property, resolved through the mapping
    pub fn index_of_property(&self, mapping: &dyn Mapping, property: &str) -> Option<usize> {
        mapping
            .column_for(property)
            .and_then(|column| self.index_of(column))
    }

    /// Number of columns in the row shape
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Columns in declaration order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// One record's column values, ordered per the layout.
///
/// Transient: lives for one evaluation pass, discarded per row unless
/// buffered for sorting or join matching.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Value at a layout index; out-of-shape indexes read as SQL NULL
    pub fn get(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&Value::Null)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}
