//! Model-level writes with timestamp bookkeeping.
//!
//! [`ModelQuery`] fills in a model's `created_at` / `updated_at` columns
//! before handing rows to a [`QueryBuilder`], and makes sure an upsert also
//! refreshes `updated_at` on conflicting rows.

use std::marker::PhantomData;

use chrono::Utc;
use oxide_upsert_core::{ConflictTarget, Dialect, Rows, SqlValue, UpdateEntry, UpdateSpec};

use crate::connection::Connection;
use crate::error::Result;
use crate::query::QueryBuilder;

/// Format of generated timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A table with optional timestamp columns.
///
/// # Example
///
/// ```ignore
/// use oxide_upsert::{Dialect, Model, Row};
///
/// struct User;
///
/// impl Model for User {
///     const TABLE: &'static str = "users";
/// }
///
/// User::query(&pool, Dialect::Sqlite)
///     .upsert(Row::new().set("name", "foo").set("active", true), "name", None)
///     .await?;
/// ```
pub trait Model {
    /// Table name.
    const TABLE: &'static str;

    /// Creation timestamp column, if the table has one.
    const CREATED_AT: Option<&'static str> = Some("created_at");

    /// Update timestamp column, if the table has one.
    const UPDATED_AT: Option<&'static str> = Some("updated_at");

    /// Returns whether timestamps are maintained at all.
    fn uses_timestamps() -> bool {
        true
    }

    /// Returns a query for this model's table.
    fn query<C: Connection>(connection: &C, dialect: Dialect) -> ModelQuery<'_, Self, C>
    where
        Self: Sized,
    {
        ModelQuery::new(connection, dialect)
    }
}

/// Writes to a model's table, maintaining its timestamp columns.
#[derive(Debug)]
pub struct ModelQuery<'c, M, C> {
    builder: QueryBuilder<'c, C>,
    timestamp: Option<String>,
    _model: PhantomData<fn() -> M>,
}

impl<'c, M: Model, C: Connection> ModelQuery<'c, M, C> {
    /// Creates a query for `M`'s table.
    pub fn new(connection: &'c C, dialect: Dialect) -> Self {
        Self {
            builder: QueryBuilder::new(connection, dialect, M::TABLE),
            timestamp: None,
            _model: PhantomData,
        }
    }

    /// Uses a fixed timestamp instead of the current time.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Returns the underlying builder.
    #[must_use]
    pub const fn builder(&self) -> &QueryBuilder<'c, C> {
        &self.builder
    }

    /// Upserts rows, setting timestamps on inserted rows and refreshing the
    /// update timestamp on conflicting ones.
    ///
    /// The default update spec (`None`) covers the caller's columns only;
    /// the creation timestamp of an existing row is never overwritten.
    ///
    /// # Errors
    ///
    /// See [`QueryBuilder::upsert`].
    pub async fn upsert(
        &self,
        rows: impl Into<Rows>,
        target: impl Into<ConflictTarget>,
        update: Option<UpdateSpec>,
    ) -> Result<u64> {
        let rows = rows.into();
        let Some(first) = rows.first() else {
            return Ok(0);
        };

        let update = update.unwrap_or_else(|| UpdateSpec::from_row(first));
        let update = self.add_updated_at(update);
        let rows = self.add_timestamps(rows);

        self.builder.upsert(rows, target, Some(update)).await
    }

    /// Inserts rows with timestamps, skipping the ones that already exist.
    ///
    /// # Errors
    ///
    /// See [`QueryBuilder::insert_ignore`].
    pub async fn insert_ignore(
        &self,
        rows: impl Into<Rows>,
        target: Option<ConflictTarget>,
    ) -> Result<u64> {
        let rows = rows.into();
        if rows.is_empty() {
            return Ok(0);
        }

        let rows = self.add_timestamps(rows);
        self.builder.insert_ignore(rows, target).await
    }

    fn fresh_timestamp(&self) -> String {
        self.timestamp
            .clone()
            .unwrap_or_else(|| Utc::now().format(TIMESTAMP_FORMAT).to_string())
    }

    /// Adds timestamp columns to every row. Values already in a row win.
    fn add_timestamps(&self, mut rows: Rows) -> Rows {
        if !M::uses_timestamps() {
            return rows;
        }

        let timestamp = SqlValue::Text(self.fresh_timestamp());
        let columns = [M::CREATED_AT, M::UPDATED_AT];

        for row in rows.iter_mut() {
            for column in columns.into_iter().flatten() {
                if !row.contains(column) {
                    row.insert(column, timestamp.clone());
                }
            }
        }

        rows
    }

    /// Appends the update timestamp column unless the spec already names it.
    ///
    /// An empty spec stays empty: it asks for an insert-only write.
    fn add_updated_at(&self, mut update: UpdateSpec) -> UpdateSpec {
        if !M::uses_timestamps() || update.is_empty() {
            return update;
        }

        if let Some(column) = M::UPDATED_AT {
            if !update.contains(column) {
                update.push(UpdateEntry::Column(column.to_string()));
            }
        }

        update
    }
}

#[cfg(test)]
mod tests {
    use oxide_upsert_core::{raw, Row, Value};

    use super::*;
    use crate::test_support::RecordingConnection;

    const NOW: &str = "2024-01-01 12:00:00";

    struct User;

    impl Model for User {
        const TABLE: &'static str = "users";
    }

    struct Event;

    impl Model for Event {
        const TABLE: &'static str = "events";
        const UPDATED_AT: Option<&'static str> = None;
    }

    struct Tag;

    impl Model for Tag {
        const TABLE: &'static str = "tags";

        fn uses_timestamps() -> bool {
            false
        }
    }

    fn text(s: &str) -> SqlValue {
        SqlValue::Text(String::from(s))
    }

    #[tokio::test]
    async fn test_upsert_adds_timestamps_and_updated_at() {
        let connection = RecordingConnection::default();
        User::query(&connection, Dialect::Sqlite)
            .with_timestamp(NOW)
            .upsert(
                vec![
                    Row::new().set("name", "foo").set("active", true),
                    Row::new().set("name", "bar").set("active", true),
                ],
                "name",
                Some(UpdateSpec::from(["active"])),
            )
            .await
            .unwrap();

        let statements = connection.statements();
        let (sql, bindings) = &statements[0];
        assert_eq!(
            sql,
            "INSERT INTO \"users\" (\"active\", \"created_at\", \"name\", \"updated_at\") \
             VALUES (?, ?, ?, ?), (?, ?, ?, ?) ON CONFLICT (\"name\") DO UPDATE SET \
             \"active\" = \"excluded\".\"active\", \"updated_at\" = \"excluded\".\"updated_at\""
        );
        assert_eq!(
            bindings[..4],
            [SqlValue::Bool(true), text(NOW), text("foo"), text(NOW)]
        );
    }

    #[tokio::test]
    async fn test_default_update_excludes_created_at() {
        let connection = RecordingConnection::default();
        User::query(&connection, Dialect::MySql)
            .with_timestamp(NOW)
            .upsert(Row::new().set("name", "foo").set("active", true), "name", None)
            .await
            .unwrap();

        let statements = connection.statements();
        let (sql, _) = &statements[0];
        assert!(sql.ends_with(
            "ON DUPLICATE KEY UPDATE `name` = VALUES(`name`), `active` = VALUES(`active`), \
             `updated_at` = VALUES(`updated_at`)"
        ));
    }

    #[tokio::test]
    async fn test_explicit_updated_at_is_not_duplicated() {
        let connection = RecordingConnection::default();
        User::query(&connection, Dialect::Postgres)
            .with_timestamp(NOW)
            .upsert(
                Row::new().set("name", "foo"),
                "name",
                Some(UpdateSpec::new().set("updated_at", None::<String>)),
            )
            .await
            .unwrap();

        let statements = connection.statements();
        let (sql, bindings) = &statements[0];
        assert!(sql.ends_with("DO UPDATE SET \"updated_at\" = ?"));
        assert_eq!(bindings.last(), Some(&SqlValue::Null));
    }

    #[tokio::test]
    async fn test_row_values_win_over_timestamps() {
        let connection = RecordingConnection::default();
        User::query(&connection, Dialect::Sqlite)
            .with_timestamp(NOW)
            .insert_ignore(
                Row::new().set("name", "foo").set("created_at", raw("CURRENT_TIMESTAMP")),
                Some("name".into()),
            )
            .await
            .unwrap();

        let statements = connection.statements();
        let (sql, bindings) = &statements[0];
        assert_eq!(
            sql,
            "INSERT INTO \"users\" (\"created_at\", \"name\", \"updated_at\") \
             VALUES (CURRENT_TIMESTAMP, ?, ?) ON CONFLICT DO NOTHING"
        );
        assert_eq!(bindings, &vec![text("foo"), text(NOW)]);
    }

    #[tokio::test]
    async fn test_model_without_updated_at() {
        let connection = RecordingConnection::default();
        Event::query(&connection, Dialect::Sqlite)
            .with_timestamp(NOW)
            .upsert(Row::new().set("name", "deploy"), "name", None)
            .await
            .unwrap();

        let statements = connection.statements();
        let (sql, _) = &statements[0];
        assert_eq!(
            sql,
            "INSERT INTO \"events\" (\"created_at\", \"name\") VALUES (?, ?) \
             ON CONFLICT (\"name\") DO UPDATE SET \"name\" = \"excluded\".\"name\""
        );
    }

    #[tokio::test]
    async fn test_model_without_timestamps() {
        let connection = RecordingConnection::default();
        Tag::query(&connection, Dialect::Sqlite)
            .insert_ignore(Row::new().set("name", "rust"), None)
            .await
            .unwrap();

        let statements = connection.statements();
        let (sql, _) = &statements[0];
        assert_eq!(
            sql,
            "INSERT INTO \"tags\" (\"name\") VALUES (?) ON CONFLICT DO NOTHING"
        );
    }

    #[tokio::test]
    async fn test_empty_update_stays_insert_only() {
        let connection = RecordingConnection::default();
        User::query(&connection, Dialect::Sqlite)
            .with_timestamp(NOW)
            .upsert(Row::new().set("name", "foo"), "name", Some(UpdateSpec::new()))
            .await
            .unwrap();

        let statements = connection.statements();
        let (sql, _) = &statements[0];
        assert!(!sql.contains("ON CONFLICT"));
    }

    #[tokio::test]
    async fn test_empty_rows() {
        let connection = RecordingConnection::default();
        let users = User::query(&connection, Dialect::Sqlite);
        assert_eq!(users.upsert(Vec::<Row>::new(), "name", None).await.unwrap(), 0);
        assert_eq!(users.insert_ignore(Vec::<Row>::new(), None).await.unwrap(), 0);
        assert!(connection.statements().is_empty());
    }

    #[test]
    fn test_fresh_timestamp_format() {
        let connection = RecordingConnection::default();
        let timestamp = User::query(&connection, Dialect::Sqlite).fresh_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_timestamps_keep_existing_values() {
        let connection = RecordingConnection::default();
        let rows = User::query(&connection, Dialect::Sqlite)
            .with_timestamp(NOW)
            .add_timestamps(Row::new().set("updated_at", "earlier").into())
            .into_vec();
        let row = &rows[0];
        assert_eq!(row.get("updated_at"), Some(&Value::from("earlier")));
        assert_eq!(row.get("created_at"), Some(&Value::from(NOW)));
    }
}
