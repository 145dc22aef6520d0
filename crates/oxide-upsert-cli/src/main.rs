//! oxide-upsert CLI
//!
//! Compiles bulk upserts for any supported dialect and runs them against
//! SQLite.

mod input;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_upsert::{CompiledStatement, Compiler, ConflictTarget, Dialect, QueryBuilder};

use crate::input::{parse_rows, parse_update};

/// Bulk UPSERT and INSERT IGNORE for MySQL, PostgreSQL, SQLite and SQL Server.
#[derive(Parser)]
#[command(name = "oxide-upsert")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Driver identifier (mysql, pgsql, sqlite, sqlsrv).
    #[arg(short, long, env = "UPSERT_DRIVER", default_value = "sqlite", global = true)]
    driver: String,

    /// Database URL (SQLite path or connection string).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3", global = true)]
    database: String,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments shared by every write.
#[derive(Args)]
struct WriteArgs {
    /// Table to write to.
    #[arg(short, long)]
    table: String,

    /// Rows as JSON: an object or an array of objects.
    #[arg(short, long)]
    rows: String,

    /// Unique-constraint columns, comma separated.
    #[arg(long, value_delimiter = ',')]
    target: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SQL and bindings for a write without executing it.
    Compile {
        #[command(flatten)]
        write: WriteArgs,

        /// Update spec as JSON (all inserted columns if not specified).
        #[arg(short, long)]
        update: Option<String>,

        /// Compile an insert-ignore instead of an upsert.
        #[arg(long, conflicts_with = "update")]
        ignore: bool,
    },

    /// Insert rows, updating the ones that already exist.
    Upsert {
        #[command(flatten)]
        write: WriteArgs,

        /// Update spec as JSON (all inserted columns if not specified).
        #[arg(short, long)]
        update: Option<String>,
    },

    /// Insert rows, skipping the ones that already exist.
    InsertIgnore {
        #[command(flatten)]
        write: WriteArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let dialect: Dialect = cli.driver.parse()?;

    match cli.command {
        Commands::Compile {
            write,
            update,
            ignore,
        } => {
            let compiler = Compiler::new(dialect, write.table);
            let rows = parse_rows(&write.rows)?;
            let target = ConflictTarget::from(write.target);

            let statement = if ignore {
                compiler.insert_ignore(rows, (!target.is_empty()).then_some(target))?
            } else {
                let update = update.as_deref().map(parse_update).transpose()?;
                compiler.upsert(rows, target, update)?
            };

            match statement {
                Some(statement) => print_statement(&statement),
                None => info!("No rows given, nothing to compile."),
            }
        }

        Commands::Upsert { write, update } => {
            let pool = connect(&cli.database, dialect).await?;
            let rows = parse_rows(&write.rows)?;
            let update = update.as_deref().map(parse_update).transpose()?;

            let affected = QueryBuilder::new(&pool, dialect, write.table)
                .upsert(rows, write.target, update)
                .await?;
            report(affected);
        }

        Commands::InsertIgnore { write } => {
            let pool = connect(&cli.database, dialect).await?;
            let rows = parse_rows(&write.rows)?;
            let target = ConflictTarget::from(write.target);

            let affected = QueryBuilder::new(&pool, dialect, write.table)
                .insert_ignore(rows, (!target.is_empty()).then_some(target))
                .await?;
            report(affected);
        }
    }

    Ok(())
}

/// Connects to the database writes are executed against.
async fn connect(database: &str, dialect: Dialect) -> anyhow::Result<SqlitePool> {
    if dialect != Dialect::Sqlite {
        bail!("only sqlite databases can be written to; use `compile` to print SQL for {dialect}");
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database)
        .await?;
    Ok(pool)
}

fn report(affected: u64) {
    info!("{affected} row(s) affected.");
    println!("{affected}");
}

fn print_statement(statement: &CompiledStatement) {
    let bindings: Vec<String> = statement
        .bindings
        .iter()
        .map(ToString::to_string)
        .collect();

    println!("{}", statement.sql);
    println!("bindings: [{}]", bindings.join(", "));
}
