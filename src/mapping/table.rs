//! Builder-style concrete mapping

use std::collections::HashMap;

use super::{Mapping, ValueType};

/// In-crate [`Mapping`] implementation: one table, explicit columns
#[derive(Debug, Clone)]
pub struct TableMapping {
    table: String,
    columns: Vec<String>,
    column_by_property: HashMap<String, String>,
    type_by_column: HashMap<String, ValueType>,
}

impl TableMapping {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            column_by_property: HashMap::new(),
            type_by_column: HashMap::new(),
        }
    }

    /// Declares a property/column pair; declaration order fixes the row shape
    pub fn with_column(
        mut self,
        property: impl Into<String>,
        column: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        let column = column.into();
        self.columns.push(column.clone());
        self.type_by_column.insert(column.clone(), value_type);
        self.column_by_property.insert(property.into(), column);
        self
    }

    /// Shorthand for properties whose column name is the property name
    pub fn with_field(self, name: &str, value_type: ValueType) -> Self {
        self.with_column(name, name, value_type)
    }
}

impl Mapping for TableMapping {
    fn table(&self) -> &str {
        &self.table
    }

    fn column_for(&self, property: &str) -> Option<&str> {
        self.column_by_property.get(property).map(String::as_str)
    }

    fn type_of_column(&self, column: &str) -> Option<ValueType> {
        self.type_by_column.get(column).copied()
    }

    fn columns(&self) -> &[String] {
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_to_column_translation() {
        let m = TableMapping::new("contact")
            .with_column("surname", "surname_col", ValueType::Text)
            .with_field("age", ValueType::Integer);

        assert_eq!(m.table(), "contact");
        assert_eq!(m.column_for("surname"), Some("surname_col"));
        assert_eq!(m.column_for("age"), Some("age"));
        assert_eq!(m.column_for("missing"), None);
        assert_eq!(m.type_of_column("surname_col"), Some(ValueType::Text));
        assert_eq!(m.columns(), &["surname_col".to_string(), "age".to_string()]);
    }
}
