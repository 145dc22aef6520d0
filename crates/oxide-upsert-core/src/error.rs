//! Error types for statement compilation.

use thiserror::Error;

/// Errors raised while preparing an UPSERT or INSERT IGNORE statement.
///
/// None of these are produced by the database: they are all detected before
/// a statement leaves the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed or contradictory input, e.g. rows with different columns.
    #[error("validation error: {0}")]
    Validation(String),

    /// The driver identifier does not name a supported dialect.
    #[error("unsupported dialect: {0}")]
    UnsupportedDialect(String),

    /// The compiled SQL and the bind list disagree.
    ///
    /// This is always a compiler bug.
    #[error("statement has {placeholders} placeholders but {bindings} bindings")]
    Binding {
        /// Placeholders found in the SQL text.
        placeholders: usize,
        /// Values in the bind list.
        bindings: usize,
    },
}

/// Result type alias for compilation.
pub type Result<T> = std::result::Result<T, Error>;
