//! MySQL grammar.

use super::{compile_assignments, BaseGrammar, Sql, UpsertGrammar};
use crate::dialect::Dialect;
use crate::row::Row;
use crate::target::ConflictTarget;
use crate::update::UpdateSpec;

/// Grammar for `ON DUPLICATE KEY UPDATE` and `INSERT IGNORE`.
///
/// MySQL resolves conflicts against every unique index of the table, so the
/// conflict target never appears in the SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MySqlGrammar;

impl MySqlGrammar {
    /// Creates the MySQL grammar.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl BaseGrammar for MySqlGrammar {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }
}

impl UpsertGrammar for MySqlGrammar {
    fn compile_upsert(
        &self,
        table: &str,
        rows: &[Row],
        _target: &ConflictTarget,
        update: &UpdateSpec,
    ) -> Sql {
        let assignments = compile_assignments(self, update, |column| {
            format!("VALUES({})", self.quote_identifier(column))
        });

        let mut sql = self.compile_insert(table, rows);
        sql.push_str(" ON DUPLICATE KEY UPDATE ");
        sql.append(assignments);
        sql
    }

    fn compile_insert_ignore(&self, table: &str, rows: &[Row], _target: &ConflictTarget) -> Sql {
        let mut sql = self.compile_insert(table, rows);
        sql.text = sql.text.replacen("INSERT", "INSERT IGNORE", 1);
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::raw;

    #[test]
    fn test_upsert() {
        let rows = vec![Row::new().set("active", true).set("name", "foo")];
        let update = UpdateSpec::from(["active"]).set("logins", raw("`logins` + 1"));
        let sql = MySqlGrammar::new().compile_upsert("users", &rows, &"name".into(), &update);
        assert_eq!(
            sql.text,
            "INSERT INTO `users` (`active`, `name`) VALUES (?, ?) \
             ON DUPLICATE KEY UPDATE `active` = VALUES(`active`), `logins` = `logins` + 1"
        );
        assert_eq!(sql.placeholders, 2);
    }

    #[test]
    fn test_escaped_quote_in_raw_assignment() {
        let rows = vec![Row::new().set("id", 1).set("note", "x")];
        let update = UpdateSpec::new()
            .set("note", raw("CONCAT(t.note, 'it\\'s')"))
            .set("n", 2);
        let sql = MySqlGrammar::new().compile_upsert("t", &rows, &"id".into(), &update);
        assert!(sql.text.ends_with("`note` = CONCAT(t.note, 'it\\'s'), `n` = ?"));
        assert_eq!(sql.placeholders, 3);
    }

    #[test]
    fn test_insert_ignore_rewrites_first_keyword_only() {
        let grammar = MySqlGrammar::new();
        let rows = vec![Row::new().set("name", "INSERT")];
        let plain = grammar.compile_insert("inserts", &rows);
        let ignore = grammar.compile_insert_ignore("inserts", &rows, &ConflictTarget::default());

        assert_eq!(ignore.text, plain.text.replacen("INSERT", "INSERT IGNORE", 1));
        assert_eq!(ignore.text, "INSERT IGNORE INTO `inserts` (`name`) VALUES (?)");
        assert_eq!(ignore.placeholders, plain.placeholders);
    }
}
