//! Upserts against an in-memory SQLite database.

use oxide_upsert::{raw, Dialect, Error, Model, QueryBuilder, Row, UpdateSpec};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create in-memory database");

    sqlx::query(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            active INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT
        )",
    )
    .execute(&pool)
    .await
    .expect("Failed to create users table");

    sqlx::query(
        "CREATE TABLE stats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            post_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            views INTEGER NOT NULL DEFAULT 0,
            was_updated INTEGER NOT NULL DEFAULT 0,
            UNIQUE (post_id, date)
        )",
    )
    .execute(&pool)
    .await
    .expect("Failed to create stats table");

    pool
}

async fn users(pool: &SqlitePool) -> Vec<(String, bool)> {
    sqlx::query_as("SELECT name, active FROM users ORDER BY name")
        .fetch_all(pool)
        .await
        .expect("Failed to read users")
}

fn user(name: &str, active: bool) -> Row {
    Row::new().set("name", name).set("active", active)
}

#[tokio::test]
async fn test_upsert_increments_existing_stats() {
    let pool = setup_pool().await;
    sqlx::query(
        "INSERT INTO stats (post_id, date, views) \
         VALUES (1, '2024-01-01', 1), (3, '2024-01-01', 5)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let stats = QueryBuilder::new(&pool, Dialect::Sqlite, "stats");
    let affected = stats
        .upsert(
            vec![
                Row::new().set("post_id", 1).set("date", "2024-01-01").set("views", 1),
                Row::new().set("post_id", 2).set("date", "2024-01-01").set("views", 1),
            ],
            ["post_id", "date"],
            Some(
                UpdateSpec::new()
                    .set("views", raw("stats.views + 1"))
                    .set("was_updated", true),
            ),
        )
        .await
        .unwrap();

    assert_eq!(affected, 2);

    let rows: Vec<(i64, i64, bool)> =
        sqlx::query_as("SELECT post_id, views, was_updated FROM stats ORDER BY post_id")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(rows, vec![(1, 2, true), (2, 1, false), (3, 5, false)]);
}

#[tokio::test]
async fn test_upsert_with_listed_columns() {
    let pool = setup_pool().await;
    let table = QueryBuilder::new(&pool, Dialect::Sqlite, "users");
    table.insert(user("foo", false)).await.unwrap();

    table
        .upsert(
            vec![user("foo", true), user("bar", true)],
            "name",
            Some(UpdateSpec::from(["active"])),
        )
        .await
        .unwrap();

    assert_eq!(
        users(&pool).await,
        vec![(String::from("bar"), true), (String::from("foo"), true)]
    );
}

#[tokio::test]
async fn test_upsert_defaults_to_all_columns() {
    let pool = setup_pool().await;
    let table = QueryBuilder::new(&pool, Dialect::Sqlite, "users");
    table.insert(user("foo", false)).await.unwrap();

    table.upsert(user("foo", true), "name", None).await.unwrap();

    assert_eq!(users(&pool).await, vec![(String::from("foo"), true)]);
}

#[tokio::test]
async fn test_empty_update_is_insert_only() {
    let pool = setup_pool().await;
    let table = QueryBuilder::new(&pool, Dialect::Sqlite, "users");

    let affected = table
        .upsert(user("foo", false), "name", Some(UpdateSpec::new()))
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let err = table
        .upsert(user("foo", true), "name", Some(UpdateSpec::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
    assert!(err.is_unique_violation());
    assert_eq!(users(&pool).await, vec![(String::from("foo"), false)]);
}

#[tokio::test]
async fn test_insert_ignore_skips_existing_rows() {
    let pool = setup_pool().await;
    let table = QueryBuilder::new(&pool, Dialect::Sqlite, "users");
    table.insert(user("foo", false)).await.unwrap();

    let inserted = table
        .insert_ignore(vec![user("foo", true), user("bar", true)], Some("name".into()))
        .await
        .unwrap();

    assert_eq!(inserted, 1);
    assert_eq!(
        users(&pool).await,
        vec![(String::from("bar"), true), (String::from("foo"), false)]
    );
}

#[tokio::test]
async fn test_insert_ignore_without_target() {
    let pool = setup_pool().await;
    let table = QueryBuilder::for_driver(&pool, "sqlite", "users").unwrap();
    table.insert(user("foo", false)).await.unwrap();

    let inserted = table.insert_ignore(user("foo", true), None).await.unwrap();

    assert_eq!(inserted, 0);
}

#[tokio::test]
async fn test_empty_rows_touch_nothing() {
    let pool = setup_pool().await;
    let table = QueryBuilder::new(&pool, Dialect::Sqlite, "users");

    assert_eq!(table.upsert(Vec::<Row>::new(), "name", None).await.unwrap(), 0);
    assert_eq!(table.insert_ignore(Vec::<Row>::new(), None).await.unwrap(), 0);
    assert!(users(&pool).await.is_empty());
}

#[tokio::test]
async fn test_mismatched_rows_are_rejected_before_execution() {
    let pool = setup_pool().await;
    let table = QueryBuilder::new(&pool, Dialect::Sqlite, "users");

    let err = table
        .upsert(
            vec![user("foo", true), Row::new().set("name", "bar")],
            "name",
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Compile(_)));
    assert!(users(&pool).await.is_empty());
}

struct User;

impl Model for User {
    const TABLE: &'static str = "users";
}

#[tokio::test]
async fn test_model_upsert_maintains_timestamps() {
    let pool = setup_pool().await;

    User::query(&pool, Dialect::Sqlite)
        .with_timestamp("2024-01-01 00:00:00")
        .upsert(user("foo", false), "name", None)
        .await
        .unwrap();

    User::query(&pool, Dialect::Sqlite)
        .with_timestamp("2024-02-01 00:00:00")
        .upsert(
            vec![user("foo", true), user("bar", true)],
            "name",
            Some(UpdateSpec::from(["active"])),
        )
        .await
        .unwrap();

    let rows: Vec<(String, bool, String, String)> = sqlx::query_as(
        "SELECT name, active, created_at, updated_at FROM users ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(
        rows,
        vec![
            (
                String::from("bar"),
                true,
                String::from("2024-02-01 00:00:00"),
                String::from("2024-02-01 00:00:00"),
            ),
            (
                String::from("foo"),
                true,
                String::from("2024-01-01 00:00:00"),
                String::from("2024-02-01 00:00:00"),
            ),
        ]
    );
}

#[tokio::test]
async fn test_model_insert_ignore_sets_timestamps() {
    let pool = setup_pool().await;

    let inserted = User::query(&pool, Dialect::Sqlite)
        .insert_ignore(vec![user("foo", true)], Some("name".into()))
        .await
        .unwrap();
    assert_eq!(inserted, 1);

    let (created_at, updated_at): (Option<String>, Option<String>) =
        sqlx::query_as("SELECT created_at, updated_at FROM users WHERE name = 'foo'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(created_at.is_some());
    assert_eq!(created_at, updated_at);
}
