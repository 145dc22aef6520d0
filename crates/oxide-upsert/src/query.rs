//! Upsert and insert-ignore against a connection.

use oxide_upsert_core::{
    CompiledStatement, Compiler, ConflictTarget, Dialect, Rows, UpdateSpec,
};
use tracing::{debug, trace};

use crate::connection::Connection;
use crate::error::Result;

/// Runs bulk writes against one table.
///
/// The dialect is fixed at construction; compilation happens per call and
/// nothing is cached between calls.
///
/// # Example
///
/// ```ignore
/// use oxide_upsert::{QueryBuilder, Row, UpdateSpec, raw};
///
/// let stats = QueryBuilder::for_driver(&pool, "sqlite", "stats")?;
/// let affected = stats
///     .upsert(
///         vec![
///             Row::new().set("post_id", 1).set("date", "2024-01-01").set("views", 1),
///             Row::new().set("post_id", 2).set("date", "2024-01-01").set("views", 1),
///         ],
///         ["post_id", "date"],
///         Some(UpdateSpec::new().set("views", raw("stats.views + 1"))),
///     )
///     .await?;
/// ```
#[derive(Debug)]
pub struct QueryBuilder<'c, C> {
    connection: &'c C,
    compiler: Compiler,
}

impl<'c, C: Connection> QueryBuilder<'c, C> {
    /// Creates a builder for `table` using `dialect`.
    pub fn new(connection: &'c C, dialect: Dialect, table: impl Into<String>) -> Self {
        Self {
            connection,
            compiler: Compiler::new(dialect, table),
        }
    }

    /// Creates a builder from a driver identifier (`mysql`, `pgsql`,
    /// `sqlite`, `sqlsrv`).
    ///
    /// # Errors
    ///
    /// Fails with an unsupported-dialect error before any row is touched.
    pub fn for_driver(connection: &'c C, driver: &str, table: impl Into<String>) -> Result<Self> {
        Ok(Self {
            connection,
            compiler: Compiler::for_driver(driver, table)?,
        })
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.compiler.dialect()
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        self.compiler.table()
    }

    /// Returns the compiler.
    #[must_use]
    pub const fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Inserts rows, updating the ones that conflict on `target`.
    ///
    /// `update` of `None` updates every inserted column; `Some` of an empty
    /// spec inserts only, so duplicates fail with a storage error. Returns
    /// the affected-row count as reported by the database (0 without rows).
    ///
    /// # Errors
    ///
    /// Compile errors for invalid input, storage errors from the database.
    pub async fn upsert(
        &self,
        rows: impl Into<Rows>,
        target: impl Into<ConflictTarget>,
        update: Option<UpdateSpec>,
    ) -> Result<u64> {
        match self.compiler.upsert(rows, target, update)? {
            Some(statement) => self.execute(statement).await,
            None => {
                trace!(table = %self.table(), "upsert without rows, skipping");
                Ok(0)
            }
        }
    }

    /// Inserts rows, skipping the ones that already exist.
    ///
    /// Returns the number of rows actually inserted.
    ///
    /// # Errors
    ///
    /// Compile errors for invalid input (including a missing target on SQL
    /// Server), storage errors from the database.
    pub async fn insert_ignore(
        &self,
        rows: impl Into<Rows>,
        target: Option<ConflictTarget>,
    ) -> Result<u64> {
        match self.compiler.insert_ignore(rows, target)? {
            Some(statement) => self.execute(statement).await,
            None => {
                trace!(table = %self.table(), "insert ignore without rows, skipping");
                Ok(0)
            }
        }
    }

    /// Inserts rows with a plain multi-row INSERT.
    ///
    /// # Errors
    ///
    /// Compile errors for invalid input, storage errors from the database.
    pub async fn insert(&self, rows: impl Into<Rows>) -> Result<u64> {
        match self.compiler.insert(rows)? {
            Some(statement) => self.execute(statement).await,
            None => Ok(0),
        }
    }

    /// Compiles [`upsert`](Self::upsert) without executing it.
    ///
    /// Returns `None` without rows.
    ///
    /// # Errors
    ///
    /// Compile errors for invalid input.
    pub fn to_upsert_sql(
        &self,
        rows: impl Into<Rows>,
        target: impl Into<ConflictTarget>,
        update: Option<UpdateSpec>,
    ) -> Result<Option<CompiledStatement>> {
        Ok(self.compiler.upsert(rows, target, update)?)
    }

    /// Compiles [`insert_ignore`](Self::insert_ignore) without executing it.
    ///
    /// # Errors
    ///
    /// Compile errors for invalid input.
    pub fn to_insert_ignore_sql(
        &self,
        rows: impl Into<Rows>,
        target: Option<ConflictTarget>,
    ) -> Result<Option<CompiledStatement>> {
        Ok(self.compiler.insert_ignore(rows, target)?)
    }

    async fn execute(&self, statement: CompiledStatement) -> Result<u64> {
        debug!(
            table = %self.table(),
            dialect = %self.dialect(),
            sql = %statement.sql,
            bindings = statement.bindings.len(),
            "Executing statement"
        );

        self.connection
            .affecting_statement(&statement.sql, statement.bindings)
            .await
    }
}
