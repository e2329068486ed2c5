//! SQL compilation subsystem
//!
//! Lowers a criteria tree into a dialect-specific, fully parameterized SQL
//! fragment. Every literal becomes a placeholder pushed onto the positional
//! parameter list in emission order — placeholder order and parameter order
//! must match exactly, since most backends bind positionally.
//!
//! Per-backend variation lives behind the [`Dialect`] capability trait
//! injected into the compiler, never behind compiler subclassing.

mod compiler;
mod dialect;
mod errors;
mod statement;

pub use compiler::{CompiledFragment, SqlCompiler};
pub use dialect::{AnsiDialect, Dialect, MySqlDialect, PostgresDialect, SqliteDialect};
pub use errors::{CompileError, CompileResult};
pub use statement::StatementBuilder;
