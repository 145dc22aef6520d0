//! SQL Server grammar.
//!
//! SQL Server has no `ON CONFLICT`. Upserts and insert-ignores are both
//! compiled to a `MERGE` whose source is a constant table built from the
//! rows:
//!
//! ```sql
//! MERGE [users] USING (VALUES (?, ?), (?, ?)) [upsert_source] ([active], [name])
//! ON [upsert_source].[name] = [users].[name]
//! WHEN MATCHED THEN UPDATE SET [active] = [upsert_source].[active]
//! WHEN NOT MATCHED THEN INSERT ([active], [name]) VALUES ([active], [name]);
//! ```
//!
//! Leaving out the `WHEN MATCHED` branch gives insert-ignore semantics.

use super::{compile_assignments, BaseGrammar, Sql, UpsertGrammar};
use crate::dialect::Dialect;
use crate::row::Row;
use crate::target::ConflictTarget;
use crate::update::UpdateSpec;

/// Alias of the constant source table in compiled `MERGE` statements.
///
/// A target table with this exact name would collide with it.
pub const SOURCE_ALIAS: &str = "upsert_source";

/// Grammar emulating upserts with `MERGE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeGrammar;

impl MergeGrammar {
    /// Creates the SQL Server grammar.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Compiles a `MERGE` statement.
    ///
    /// Without `update` (or with an empty one) no `WHEN MATCHED` branch is
    /// emitted and existing rows are left alone.
    #[must_use]
    pub fn compile_merge(
        &self,
        table: &str,
        rows: &[Row],
        target: &ConflictTarget,
        update: Option<&UpdateSpec>,
    ) -> Sql {
        let columns: Vec<&str> = rows
            .first()
            .map(|row| row.columns().collect())
            .unwrap_or_default();
        let columns = self.columnize(&columns);

        let on: Vec<String> = target
            .columns()
            .map(|column| {
                format!(
                    "{} = {}",
                    self.quote_identifier(&format!("{SOURCE_ALIAS}.{column}")),
                    self.quote_identifier(&format!("{table}.{column}"))
                )
            })
            .collect();

        let mut sql = Sql::new(format!("MERGE {} USING (VALUES ", self.wrap_table(table)));
        sql.append(self.value_groups(rows));
        sql.push_str(&format!(
            ") {} ({columns}) ON {} ",
            self.wrap_table(SOURCE_ALIAS),
            on.join(" AND ")
        ));

        if let Some(update) = update.filter(|update| !update.is_empty()) {
            let assignments = compile_assignments(self, update, |column| {
                self.quote_identifier(&format!("{SOURCE_ALIAS}.{column}"))
            });
            sql.push_str("WHEN MATCHED THEN UPDATE SET ");
            sql.append(assignments);
            sql.push_str(" ");
        }

        sql.push_str(&format!(
            "WHEN NOT MATCHED THEN INSERT ({columns}) VALUES ({columns});"
        ));
        sql
    }
}

impl BaseGrammar for MergeGrammar {
    fn dialect(&self) -> Dialect {
        Dialect::SqlServer
    }
}

impl UpsertGrammar for MergeGrammar {
    fn compile_upsert(
        &self,
        table: &str,
        rows: &[Row],
        target: &ConflictTarget,
        update: &UpdateSpec,
    ) -> Sql {
        self.compile_merge(table, rows, target, Some(update))
    }

    fn compile_insert_ignore(&self, table: &str, rows: &[Row], target: &ConflictTarget) -> Sql {
        self.compile_merge(table, rows, target, None)
    }
}
