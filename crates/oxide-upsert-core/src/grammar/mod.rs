//! Dialect grammars.
//!
//! [`BaseGrammar`] compiles the plain multi-row INSERT every upsert starts
//! from, and owns identifier quoting and placeholder rendering.
//! [`UpsertGrammar`] adds the two conflict-aware statements. There are three
//! implementations:
//!
//! - [`OnConflictGrammar`]: PostgreSQL and SQLite, `ON CONFLICT (...) DO ...`
//! - [`MySqlGrammar`]: `ON DUPLICATE KEY UPDATE` and `INSERT IGNORE`
//! - [`MergeGrammar`]: SQL Server, emulated with `MERGE ... USING (VALUES ...)`
//!
//! [`Grammar`] wraps whichever one a [`Dialect`] selects.

mod conflict;
mod merge;
mod mysql;

pub use conflict::OnConflictGrammar;
pub use merge::{MergeGrammar, SOURCE_ALIAS};
pub use mysql::MySqlGrammar;

use std::fmt;

use crate::dialect::Dialect;
use crate::row::Row;
use crate::target::ConflictTarget;
use crate::update::{UpdateEntry, UpdateSpec};
use crate::value::Value;

/// SQL text and the number of placeholders rendered into it.
///
/// The count grows only when a bound value is rendered, so a `?` inside a
/// raw expression or a literal is never counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sql {
    /// SQL text.
    pub text: String,
    /// Placeholders written into `text`.
    pub placeholders: usize,
}

impl Sql {
    /// Creates a fragment without placeholders.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            placeholders: 0,
        }
    }

    /// Creates a fragment holding a single placeholder.
    #[must_use]
    pub fn placeholder(text: &str) -> Self {
        Self {
            text: String::from(text),
            placeholders: 1,
        }
    }

    /// Appends literal text.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Appends another fragment and its placeholders.
    pub fn append(&mut self, other: Self) {
        self.text.push_str(&other.text);
        self.placeholders += other.placeholders;
    }

    /// Joins fragments with a separator.
    pub fn join(parts: impl IntoIterator<Item = Self>, separator: &str) -> Self {
        let mut joined = Self::default();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                joined.push_str(separator);
            }
            joined.append(part);
        }
        joined
    }

    /// Wraps the fragment in parentheses.
    #[must_use]
    pub fn parenthesized(self) -> Self {
        Self {
            text: format!("({})", self.text),
            placeholders: self.placeholders,
        }
    }
}

impl fmt::Display for Sql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Plain INSERT compilation plus quoting and placeholders.
pub trait BaseGrammar {
    /// Returns the dialect this grammar compiles for.
    fn dialect(&self) -> Dialect;

    /// Returns the bind parameter placeholder.
    fn placeholder(&self) -> &'static str {
        "?"
    }

    /// Quotes an identifier. Dotted names are quoted segment by segment.
    fn quote_identifier(&self, name: &str) -> String {
        let (open, close) = self.dialect().identifier_quotes();
        let escaped_close = format!("{close}{close}");
        name.split('.')
            .map(|segment| format!("{open}{}{close}", segment.replace(close, &escaped_close)))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quotes a table name.
    fn wrap_table(&self, table: &str) -> String {
        self.quote_identifier(table)
    }

    /// Quotes and joins column names.
    fn columnize(&self, columns: &[&str]) -> String {
        columns
            .iter()
            .map(|column| self.quote_identifier(column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Renders a value: a placeholder if bound, the SQL text if raw.
    fn parameter(&self, value: &Value) -> Sql {
        match value {
            Value::Bind(_) => Sql::placeholder(self.placeholder()),
            Value::Raw(expr) => Sql::new(expr.as_str()),
        }
    }

    /// Renders a row's values, comma separated.
    fn parameterize(&self, row: &Row) -> Sql {
        Sql::join(row.values().map(|value| self.parameter(value)), ", ")
    }

    /// Renders one parenthesized value group per row.
    fn value_groups(&self, rows: &[Row]) -> Sql {
        Sql::join(
            rows.iter().map(|row| self.parameterize(row).parenthesized()),
            ", ",
        )
    }

    /// Compiles `INSERT INTO t (cols) VALUES (...), (...)`.
    ///
    /// Columns are taken from the first row; rows are expected to be
    /// normalized and non-empty.
    fn compile_insert(&self, table: &str, rows: &[Row]) -> Sql {
        let columns: Vec<&str> = rows
            .first()
            .map(|row| row.columns().collect())
            .unwrap_or_default();

        let mut sql = Sql::new(format!(
            "INSERT INTO {} ({}) VALUES ",
            self.wrap_table(table),
            self.columnize(&columns)
        ));
        sql.append(self.value_groups(rows));
        sql
    }
}

/// Conflict-aware statement compilation.
pub trait UpsertGrammar: BaseGrammar {
    /// Compiles an insert that updates conflicting rows per `update`.
    fn compile_upsert(
        &self,
        table: &str,
        rows: &[Row],
        target: &ConflictTarget,
        update: &UpdateSpec,
    ) -> Sql;

    /// Compiles an insert that skips conflicting rows.
    fn compile_insert_ignore(&self, table: &str, rows: &[Row], target: &ConflictTarget) -> Sql;
}

/// Renders an update clause's assignments.
///
/// `from_inserted` renders the "value about to be inserted" reference for
/// positional entries; explicit assignments render as [`BaseGrammar::parameter`].
pub(crate) fn compile_assignments<G, F>(
    grammar: &G,
    update: &UpdateSpec,
    from_inserted: F,
) -> Sql
where
    G: BaseGrammar + ?Sized,
    F: Fn(&str) -> String,
{
    let assignments = update.iter().map(|entry| match entry {
        UpdateEntry::Column(column) => Sql::new(format!(
            "{} = {}",
            grammar.quote_identifier(column),
            from_inserted(column)
        )),
        UpdateEntry::Assign(column, value) => {
            let mut assignment = Sql::new(format!("{} = ", grammar.quote_identifier(column)));
            assignment.append(grammar.parameter(value));
            assignment
        }
    });

    Sql::join(assignments, ", ")
}

/// The grammar for one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// PostgreSQL and SQLite.
    OnConflict(OnConflictGrammar),
    /// MySQL.
    MySql(MySqlGrammar),
    /// SQL Server.
    Merge(MergeGrammar),
}

impl BaseGrammar for Grammar {
    fn dialect(&self) -> Dialect {
        match self {
            Self::OnConflict(g) => g.dialect(),
            Self::MySql(g) => g.dialect(),
            Self::Merge(g) => g.dialect(),
        }
    }
}

impl UpsertGrammar for Grammar {
    fn compile_upsert(
        &self,
        table: &str,
        rows: &[Row],
        target: &ConflictTarget,
        update: &UpdateSpec,
    ) -> Sql {
        match self {
            Self::OnConflict(g) => g.compile_upsert(table, rows, target, update),
            Self::MySql(g) => g.compile_upsert(table, rows, target, update),
            Self::Merge(g) => g.compile_upsert(table, rows, target, update),
        }
    }

    fn compile_insert_ignore(&self, table: &str, rows: &[Row], target: &ConflictTarget) -> Sql {
        match self {
            Self::OnConflict(g) => g.compile_insert_ignore(table, rows, target),
            Self::MySql(g) => g.compile_insert_ignore(table, rows, target),
            Self::Merge(g) => g.compile_insert_ignore(table, rows, target),
        }
    }
}
