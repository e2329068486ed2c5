//! Dialect capability interface
//!
//! The handful of per-backend SQL fragments the compiler consults. One small
//! strategy object per backend instead of a compiler subclass per backend.

/// Per-backend SQL capabilities
pub trait Dialect {
    /// Dialect name, for diagnostics and error messages
    fn name(&self) -> &'static str;

    /// Positional placeholder for the 1-based parameter ordinal
    fn placeholder(&self, ordinal: usize) -> String {
        let _ = ordinal;
        "?".to_string()
    }

    /// Function that lowercases a string expression
    fn lowercase_function(&self) -> &'static str {
        "LOWER"
    }

    /// Modulus expression over two already-rendered operands
    fn modulus_expr(&self, operand: &str, divisor: &str) -> String {
        format!("MOD({operand}, {divisor})")
    }

    /// Bitwise-AND expression over two already-rendered operands
    fn bitand_expr(&self, operand: &str, mask: &str) -> String {
        format!("({operand} & {mask})")
    }

    /// Query text yielding the next value of a named sequence, if the
    /// backend has sequences at all
    fn next_sequence_value(&self, sequence: &str) -> Option<String>;

    /// Whether TRUNCATE TABLE exists; otherwise an unconditional DELETE is
    /// emitted instead
    fn supports_truncate(&self) -> bool {
        true
    }

    /// Whether table/column aliases need an explicit AS keyword. Consulted
    /// by connection layers rendering aliased SELECT lists; this crate only
    /// emits unaliased fragments.
    fn alias_requires_as(&self) -> bool {
        false
    }

    /// Whether column-alias wrapper characters leak into result-set
    /// metadata. Connection layers reading cursor column names strip the
    /// wrappers when this is set.
    fn alias_wrappers_in_metadata(&self) -> bool {
        false
    }

    /// Identifier quoting pair
    fn quotes(&self) -> (char, char) {
        ('"', '"')
    }

    /// Renders a quoted identifier
    fn quote(&self, identifier: &str) -> String {
        let (open, close) = self.quotes();
        format!("{open}{identifier}{close}")
    }
}

/// Baseline dialect: standard placeholders, quoting, and sequence syntax
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiDialect;

impl Dialect for AnsiDialect {
    fn name(&self) -> &'static str {
        "ansi"
    }

    fn next_sequence_value(&self, sequence: &str) -> Option<String> {
        Some(format!("SELECT NEXT VALUE FOR {}", self.quote(sequence)))
    }
}

/// SQLite: no TRUNCATE, no sequences, `%` modulus
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn modulus_expr(&self, operand: &str, divisor: &str) -> String {
        format!("({operand} % {divisor})")
    }

    fn next_sequence_value(&self, _sequence: &str) -> Option<String> {
        None
    }

    fn supports_truncate(&self) -> bool {
        false
    }
}

/// MySQL: backtick quoting, LCASE, no sequences
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn lowercase_function(&self) -> &'static str {
        "LCASE"
    }

    fn modulus_expr(&self, operand: &str, divisor: &str) -> String {
        format!("({operand} % {divisor})")
    }

    fn next_sequence_value(&self, _sequence: &str) -> Option<String> {
        None
    }

    fn quotes(&self) -> (char, char) {
        ('`', '`')
    }
}

/// PostgreSQL: `$n` placeholders, `nextval`, `%` modulus
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, ordinal: usize) -> String {
        format!("${ordinal}")
    }

    fn modulus_expr(&self, operand: &str, divisor: &str) -> String {
        format!("({operand} % {divisor})")
    }

    fn next_sequence_value(&self, sequence: &str) -> Option<String> {
        Some(format!("SELECT nextval('{sequence}')"))
    }

    fn alias_requires_as(&self) -> bool {
        true
    }
}
