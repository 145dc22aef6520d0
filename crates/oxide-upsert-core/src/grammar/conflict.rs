//! `ON CONFLICT` grammar for PostgreSQL and SQLite.

use super::{compile_assignments, BaseGrammar, Sql, UpsertGrammar};
use crate::dialect::Dialect;
use crate::row::Row;
use crate::target::ConflictTarget;
use crate::update::UpdateSpec;

/// Grammar for dialects with `INSERT ... ON CONFLICT`.
///
/// Positional update entries read the candidate row through the `excluded`
/// pseudo-table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnConflictGrammar {
    dialect: Dialect,
}

impl OnConflictGrammar {
    /// Creates the grammar for PostgreSQL or SQLite.
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }
}

impl BaseGrammar for OnConflictGrammar {
    fn dialect(&self) -> Dialect {
        self.dialect
    }
}

impl UpsertGrammar for OnConflictGrammar {
    fn compile_upsert(
        &self,
        table: &str,
        rows: &[Row],
        target: &ConflictTarget,
        update: &UpdateSpec,
    ) -> Sql {
        let target: Vec<&str> = target.columns().collect();
        let excluded = self.quote_identifier("excluded");
        let assignments = compile_assignments(self, update, |column| {
            format!("{excluded}.{}", self.quote_identifier(column))
        });

        let mut sql = self.compile_insert(table, rows);
        sql.push_str(&format!(
            " ON CONFLICT ({}) DO UPDATE SET ",
            self.columnize(&target)
        ));
        sql.append(assignments);
        sql
    }

    fn compile_insert_ignore(&self, table: &str, rows: &[Row], _target: &ConflictTarget) -> Sql {
        let mut sql = self.compile_insert(table, rows);
        sql.push_str(" ON CONFLICT DO NOTHING");
        sql
    }
}
