//! SQL dialect selection.
//!
//! A [`Dialect`] is chosen once per connection from its driver identifier
//! and maps to the grammar that compiles upserts for it.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::grammar::{Grammar, MergeGrammar, MySqlGrammar, OnConflictGrammar};

/// A supported database dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// MySQL and MariaDB.
    MySql,
    /// PostgreSQL.
    Postgres,
    /// SQLite 3.24+.
    Sqlite,
    /// Microsoft SQL Server.
    SqlServer,
}

impl Dialect {
    /// All supported dialects.
    pub const ALL: [Self; 4] = [Self::MySql, Self::Postgres, Self::Sqlite, Self::SqlServer];

    /// Returns the driver identifier (`mysql`, `pgsql`, `sqlite`, `sqlsrv`).
    #[must_use]
    pub const fn driver(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "pgsql",
            Self::Sqlite => "sqlite",
            Self::SqlServer => "sqlsrv",
        }
    }

    /// Returns the identifier quote pair.
    #[must_use]
    pub const fn identifier_quotes(self) -> (char, char) {
        match self {
            Self::MySql => ('`', '`'),
            Self::Postgres | Self::Sqlite => ('"', '"'),
            Self::SqlServer => ('[', ']'),
        }
    }

    /// Returns the grammar that compiles statements for this dialect.
    #[must_use]
    pub const fn grammar(self) -> Grammar {
        match self {
            Self::MySql => Grammar::MySql(MySqlGrammar::new()),
            Self::Postgres | Self::Sqlite => Grammar::OnConflict(OnConflictGrammar::new(self)),
            Self::SqlServer => Grammar::Merge(MergeGrammar::new()),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.driver())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Self::MySql),
            "pgsql" | "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "sqlsrv" | "sqlserver" | "mssql" => Ok(Self::SqlServer),
            _ => Err(Error::UnsupportedDialect(s.to_string())),
        }
    }
}
