//! sqlgram-migrate CLI
//!
//! Command-line tool for applying JSON table manifests as migrations.

use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sqlgram_core::schema::SchemaGrammar;
use sqlgram_core::{MySqlDialect, SqliteDialect};
use sqlgram_migrate::{Manifest, Migrator, DEFAULT_TABLE};

/// Batch-based schema migrations driven by JSON table manifests.
#[derive(Parser)]
#[command(name = "sqlgram-migrate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (SQLite path or connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// SQL dialect used to compile DDL.
    #[arg(long, value_enum, env = "SQLGRAM_DIALECT", default_value = "sqlite")]
    dialect: DialectArg,

    /// Name of the migration history table.
    #[arg(long, default_value = DEFAULT_TABLE)]
    table: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DialectArg {
    Mysql,
    Sqlite,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the migration history table.
    Init,

    /// Show which manifests have been applied.
    Status {
        /// Manifest files, in application order.
        manifests: Vec<PathBuf>,
    },

    /// Print the DDL of a manifest without touching a database.
    Ddl {
        /// Manifest file.
        manifest: PathBuf,
    },

    /// Apply pending manifests as one batch.
    Migrate {
        /// Manifest files, in application order.
        #[arg(required = true)]
        manifests: Vec<PathBuf>,

        /// Print the SQL without executing it.
        #[arg(long)]
        pretend: bool,
    },

    /// Revert the most recent batch.
    Rollback {
        /// Manifest files the batch was applied from.
        #[arg(required = true)]
        manifests: Vec<PathBuf>,
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

    match cli.dialect {
        DialectArg::Mysql => execute(cli, MySqlDialect::new()).await,
        DialectArg::Sqlite => execute(cli, SqliteDialect::new()).await,
    }
}

async fn execute<G: SchemaGrammar>(cli: Cli, grammar: G) -> anyhow::Result<()> {
    // Statements run through the SQLite pool, so only SQLite DDL can execute.
    let executable = cli.dialect == DialectArg::Sqlite;

    match cli.command {
        Commands::Ddl { manifest } => {
            let manifest = Manifest::from_path(&manifest)?;
            for sql in manifest.compile(&grammar)? {
                println!("{sql};");
            }
        }

        Commands::Init => {
            let migrator = open(&cli.database, &cli.table, grammar, &[]).await?;
            migrator.install().await?;
            info!(table = %cli.table, "Migration history table is ready.");
        }

        Commands::Status { manifests } => {
            let migrator = open(&cli.database, &cli.table, grammar, &manifests).await?;
            let status = migrator.status().await?;
            if status.is_empty() {
                info!("No manifests given.");
            }
            for entry in &status {
                match entry.batch {
                    Some(batch) => println!(" [X] {} (batch {batch})", entry.name),
                    None => println!(" [ ] {}", entry.name),
                }
            }

            let applied = if migrator.history().exists().await? {
                migrator.history().get_applied().await?
            } else {
                Vec::new()
            };
            for record in applied
                .iter()
                .filter(|record| !status.iter().any(|entry| entry.name == record.name))
            {
                println!(
                    " [?] {} (batch {}, applied {})",
                    record.name,
                    record.batch,
                    record.applied_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }

        Commands::Migrate {
            manifests,
            pretend,
        } => {
            let migrator = open(&cli.database, &cli.table, grammar, &manifests).await?;
            if pretend {
                info!("Pretend mode - SQL will be printed but not executed.");
                for (name, statements) in migrator.pretend().await? {
                    println!("-- {name}");
                    for sql in statements {
                        println!("{sql};");
                    }
                }
                return Ok(());
            }

            if !executable {
                bail!("only the sqlite dialect can be executed; use --pretend or ddl instead");
            }
            let ran = migrator.run().await?;
            if ran.is_empty() {
                info!("No pending migrations.");
            }
            for name in ran {
                println!("Migrated: {name}");
            }
        }

        Commands::Rollback { manifests } => {
            if !executable {
                bail!("only the sqlite dialect can be executed");
            }
            let migrator = open(&cli.database, &cli.table, grammar, &manifests).await?;
            for name in migrator.rollback().await? {
                println!("Rolled back: {name}");
            }
        }
    }

    Ok(())
}

async fn open<G: SchemaGrammar>(
    database: &str,
    table: &str,
    grammar: G,
    manifests: &[PathBuf],
) -> anyhow::Result<Migrator<G>> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database)
        .await?;

    let mut migrator = Migrator::new(pool, grammar).with_table(table);
    for path in manifests {
        migrator = migrator.register(Manifest::from_path(path)?);
    }
    Ok(migrator)
}
