//! Statement compilation for one table.
//!
//! [`Compiler`] runs the whole pipeline for a write: normalize the rows,
//! resolve the update spec, compile with the dialect's grammar, and pair the
//! SQL with its bind list. It performs no I/O.

use crate::binder::{bindings, CompiledStatement};
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::grammar::{BaseGrammar, Grammar, UpsertGrammar};
use crate::row::{normalize, Rows};
use crate::target::ConflictTarget;
use crate::update::UpdateSpec;

/// Compiles writes to one table in one dialect.
///
/// Methods return `Ok(None)` when there are no rows: there is nothing to
/// execute.
///
/// ```rust
/// use oxide_upsert_core::{Compiler, Dialect, Row};
///
/// let compiler = Compiler::new(Dialect::Postgres, "users");
/// let statement = compiler
///     .upsert(Row::new().set("name", "foo"), "name", None)
///     .unwrap()
///     .unwrap();
///
/// assert_eq!(
///     statement.sql,
///     "INSERT INTO \"users\" (\"name\") VALUES (?) \
///      ON CONFLICT (\"name\") DO UPDATE SET \"name\" = \"excluded\".\"name\""
/// );
/// assert_eq!(statement.bindings.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Compiler {
    grammar: Grammar,
    table: String,
}

impl Compiler {
    /// Creates a compiler for `table` in `dialect`.
    #[must_use]
    pub fn new(dialect: Dialect, table: impl Into<String>) -> Self {
        Self {
            grammar: dialect.grammar(),
            table: table.into(),
        }
    }

    /// Creates a compiler from a driver identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDialect`] for unknown drivers.
    pub fn for_driver(driver: &str, table: impl Into<String>) -> Result<Self> {
        Ok(Self::new(driver.parse()?, table))
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.grammar.dialect()
    }

    /// Returns the grammar.
    #[must_use]
    pub const fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Compiles a plain multi-row insert.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for rows with differing columns.
    pub fn insert(&self, rows: impl Into<Rows>) -> Result<Option<CompiledStatement>> {
        let rows = rows.into();
        if rows.is_empty() {
            return Ok(None);
        }

        let rows = normalize(rows)?;
        let sql = self.grammar.compile_insert(&self.table, &rows);
        CompiledStatement::new(sql, bindings(&rows, None)).map(Some)
    }

    /// Compiles an upsert.
    ///
    /// `update` of `None` updates every inserted column. An empty spec
    /// compiles a plain insert, so conflicts fail in the database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty conflict target or rows
    /// with differing columns.
    pub fn upsert(
        &self,
        rows: impl Into<Rows>,
        target: impl Into<ConflictTarget>,
        update: Option<UpdateSpec>,
    ) -> Result<Option<CompiledStatement>> {
        let rows = rows.into();
        if rows.is_empty() {
            return Ok(None);
        }
        if update.as_ref().is_some_and(UpdateSpec::is_empty) {
            return self.insert(rows);
        }

        let target = target.into();
        if target.is_empty() {
            return Err(Error::Validation(String::from(
                "upsert requires at least one conflict target column",
            )));
        }

        let rows = normalize(rows)?;
        let update = update.unwrap_or_else(|| UpdateSpec::from_row(&rows[0]));

        let sql = self
            .grammar
            .compile_upsert(&self.table, &rows, &target, &update);
        CompiledStatement::new(sql, bindings(&rows, Some(&update))).map(Some)
    }

    /// Compiles an insert that skips rows conflicting with existing ones.
    ///
    /// The target is unused by MySQL and optional for PostgreSQL and SQLite.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for rows with differing columns, or for
    /// SQL Server without a conflict target.
    pub fn insert_ignore(
        &self,
        rows: impl Into<Rows>,
        target: Option<ConflictTarget>,
    ) -> Result<Option<CompiledStatement>> {
        let rows = rows.into();
        if rows.is_empty() {
            return Ok(None);
        }

        let target = target.unwrap_or_default();
        if target.is_empty() && self.dialect() == Dialect::SqlServer {
            return Err(Error::Validation(String::from(
                "MERGE-based insert ignore requires a conflict target",
            )));
        }

        let rows = normalize(rows)?;
        let sql = self
            .grammar
            .compile_insert_ignore(&self.table, &rows, &target);
        CompiledStatement::new(sql, bindings(&rows, None)).map(Some)
    }
}
