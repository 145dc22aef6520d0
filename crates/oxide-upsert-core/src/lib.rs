//! # oxide-upsert-core
//!
//! Dialect-aware compiler for bulk UPSERT and INSERT IGNORE statements.
//!
//! Given rows, the columns of a unique constraint, and an update policy, the
//! compiler produces dialect-specific SQL and the ordered list of values to
//! bind to it:
//!
//! | Dialect    | Upsert                              | Insert ignore           |
//! |------------|-------------------------------------|-------------------------|
//! | PostgreSQL | `ON CONFLICT (...) DO UPDATE SET`   | `ON CONFLICT DO NOTHING`|
//! | SQLite     | `ON CONFLICT (...) DO UPDATE SET`   | `ON CONFLICT DO NOTHING`|
//! | MySQL      | `ON DUPLICATE KEY UPDATE`           | `INSERT IGNORE`         |
//! | SQL Server | `MERGE ... WHEN MATCHED ...`        | `MERGE` without update  |
//!
//! Placeholders always bind row values first (row by row, columns sorted by
//! name), then explicit update assignments. Raw expressions are inlined and
//! never bound.
//!
//! ## Example
//!
//! ```rust
//! use oxide_upsert_core::{raw, Compiler, Dialect, Row, SqlValue, UpdateSpec};
//!
//! let rows = vec![
//!     Row::new().set("post_id", 1).set("date", "2024-01-01").set("views", 1),
//!     Row::new().set("post_id", 2).set("date", "2024-01-01").set("views", 1),
//! ];
//! let update = UpdateSpec::new()
//!     .set("views", raw("stats.views + 1"))
//!     .set("was_updated", true);
//!
//! let statement = Compiler::new(Dialect::Postgres, "stats")
//!     .upsert(rows, ["post_id", "date"], Some(update))
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(
//!     statement.sql,
//!     "INSERT INTO \"stats\" (\"date\", \"post_id\", \"views\") VALUES (?, ?, ?), (?, ?, ?) \
//!      ON CONFLICT (\"post_id\", \"date\") DO UPDATE SET \
//!      \"views\" = stats.views + 1, \"was_updated\" = ?"
//! );
//! assert_eq!(statement.bindings.len(), 7);
//! assert_eq!(statement.bindings[6], SqlValue::Bool(true));
//! ```

pub mod binder;
pub mod compiler;
pub mod dialect;
pub mod error;
pub mod grammar;
pub mod row;
pub mod target;
pub mod update;
pub mod value;

pub use binder::CompiledStatement;
pub use compiler::Compiler;
pub use dialect::Dialect;
pub use error::{Error, Result};
pub use grammar::{BaseGrammar, Grammar, Sql, UpsertGrammar};
pub use row::{Row, Rows};
pub use target::ConflictTarget;
pub use update::{UpdateEntry, UpdateSpec};
pub use value::{raw, RawExpr, SqlValue, ToSqlValue, Value};
