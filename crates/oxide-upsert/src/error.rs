//! Error types for upsert operations.

use thiserror::Error;

/// Errors returned by [`QueryBuilder`](crate::QueryBuilder) and
/// [`ModelQuery`](crate::ModelQuery).
#[derive(Debug, Error)]
pub enum Error {
    /// The statement could not be compiled (bad input, unknown dialect, or
    /// a binding mismatch).
    #[error(transparent)]
    Compile(#[from] oxide_upsert_core::Error),

    /// The database rejected the statement, e.g. a unique-constraint
    /// violation on an insert-only upsert.
    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl Error {
    /// Returns whether the database reported a unique-constraint violation.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Storage(sqlx::Error::Database(err)) => err.is_unique_violation(),
            _ => false,
        }
    }
}

/// Result type alias for upsert operations.
pub type Result<T> = std::result::Result<T, Error>;
