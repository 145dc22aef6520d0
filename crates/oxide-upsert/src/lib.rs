//! # oxide-upsert
//!
//! Bulk UPSERT and INSERT IGNORE with one API for MySQL, PostgreSQL, SQLite
//! and SQL Server.
//!
//! This crate provides:
//! - [`QueryBuilder`] to run `upsert`, `insert_ignore` and `insert` against
//!   a table through a [`Connection`]
//! - [`Model`] and [`ModelQuery`] to maintain `created_at` / `updated_at`
//!   columns on the way
//! - a [`Connection`] implementation for `sqlx::SqlitePool`
//!
//! SQL compilation lives in `oxide-upsert-core`; its types are re-exported
//! here.
//!
//! ## Quick Start
//!
//! ```ignore
//! use oxide_upsert::{QueryBuilder, Dialect, Row, UpdateSpec};
//! use sqlx::SqlitePool;
//!
//! async fn example(pool: &SqlitePool) -> oxide_upsert::Result<()> {
//!     let users = QueryBuilder::new(pool, Dialect::Sqlite, "users");
//!
//!     // Insert or update `active` for existing names
//!     users
//!         .upsert(
//!             vec![
//!                 Row::new().set("name", "foo").set("active", true),
//!                 Row::new().set("name", "bar").set("active", true),
//!             ],
//!             "name",
//!             Some(UpdateSpec::from(["active"])),
//!         )
//!         .await?;
//!
//!     // Insert only names that are not there yet
//!     let inserted = users
//!         .insert_ignore(Row::new().set("name", "baz").set("active", false), Some("name".into()))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

mod connection;
mod error;
mod model;
mod query;

#[cfg(test)]
mod test_support;

pub use connection::Connection;
pub use error::{Error, Result};
pub use model::{Model, ModelQuery, TIMESTAMP_FORMAT};
pub use query::QueryBuilder;

// Re-export the compiler types callers build writes from.
pub use oxide_upsert_core::{
    raw, CompiledStatement, Compiler, ConflictTarget, Dialect, RawExpr, Row, Rows, SqlValue,
    ToSqlValue, UpdateEntry, UpdateSpec, Value,
};
