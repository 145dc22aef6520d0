//! The execution boundary.

use std::future::Future;

use oxide_upsert_core::SqlValue;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqlitePool};
use sqlx::Sqlite;

use crate::error::Result;

/// Something that runs a statement and reports how many rows it affected.
///
/// Errors from the database are returned unchanged as
/// [`Error::Storage`](crate::Error::Storage).
pub trait Connection: Sync {
    /// Executes `sql` with `bindings` and returns the affected-row count.
    fn affecting_statement(
        &self,
        sql: &str,
        bindings: Vec<SqlValue>,
    ) -> impl Future<Output = Result<u64>> + Send;
}

impl Connection for SqlitePool {
    async fn affecting_statement(&self, sql: &str, bindings: Vec<SqlValue>) -> Result<u64> {
        let mut query = sqlx::query(sql);
        for value in bindings {
            query = bind_param(query, value);
        }

        let result = query.execute(self).await?;
        Ok(result.rows_affected())
    }
}

/// Binds a SqlValue parameter to a query.
fn bind_param<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: SqlValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
    }
}
