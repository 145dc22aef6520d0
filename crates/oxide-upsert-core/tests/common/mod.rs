#![allow(dead_code)]

use oxide_upsert_core::{raw, CompiledStatement, Compiler, Dialect, Row, UpdateSpec};

pub fn stats_rows() -> Vec<Row> {
    vec![
        Row::new()
            .set("post_id", 1)
            .set("date", "2024-01-01")
            .set("views", 1),
        Row::new()
            .set("views", 1)
            .set("post_id", 2)
            .set("date", "2024-01-01"),
    ]
}

pub fn stats_update() -> UpdateSpec {
    UpdateSpec::new()
        .set("views", raw("stats.views + 1"))
        .set("was_updated", true)
}

pub fn upsert(
    dialect: Dialect,
    table: &str,
    rows: Vec<Row>,
    target: &[&str],
    update: Option<UpdateSpec>,
) -> CompiledStatement {
    Compiler::new(dialect, table)
        .upsert(rows, target, update)
        .unwrap_or_else(|e| panic!("Failed to compile upsert for {dialect}: {e}"))
        .expect("Expected a statement for non-empty rows")
}

pub fn insert_ignore(
    dialect: Dialect,
    table: &str,
    rows: Vec<Row>,
    target: &[&str],
) -> CompiledStatement {
    Compiler::new(dialect, table)
        .insert_ignore(rows, Some(target.into()))
        .unwrap_or_else(|e| panic!("Failed to compile insert ignore for {dialect}: {e}"))
        .expect("Expected a statement for non-empty rows")
}

/// Counts `?` outside string literals and quoted identifiers.
///
/// Only meaningful for statements whose raw expressions contain no `?`.
pub fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    let mut closing: Option<char> = None;

    for c in sql.chars() {
        match closing {
            // Doubled quotes close and reopen, which nets out the same.
            Some(close) if c == close => closing = None,
            Some(_) => {}
            None => match c {
                '?' => count += 1,
                '\'' | '"' | '`' => closing = Some(c),
                '[' => closing = Some(']'),
                _ => {}
            },
        }
    }

    count
}
