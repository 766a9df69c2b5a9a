//! Batch-based schema migrations for sqlgram.
//!
//! `sqlgram-migrate` runs [`Migration`]s described with the sqlgram
//! [`Schema`](sqlgram_core::Schema) recorder:
//!
//! - **Migration** - a named, reversible schema change (`up` / `down`)
//! - **Manifest** - a migration declared as JSON table manifests
//! - **History** - the table recording which migrations ran, per batch
//! - **Migrator** - applies pending migrations as one batch and rolls back
//!   the most recent one
//!
//! # Example
//!
//! ```rust,no_run
//! use sqlgram_core::SqliteDialect;
//! use sqlgram_migrate::{Manifest, Migrator};
//! use sqlx::sqlite::SqlitePoolOptions;
//!
//! # async fn run() -> sqlgram_migrate::Result<()> {
//! let pool = SqlitePoolOptions::new().connect("sqlite:app.db").await?;
//! let manifest = Manifest::from_path("migrations/0001_blog.json".as_ref())?;
//!
//! let migrator = Migrator::new(pool, SqliteDialect::new()).register(manifest);
//! for name in migrator.run().await? {
//!     println!("migrated {name}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Create the history table
//! sqlgram-migrate init
//!
//! # Apply manifests as one batch
//! sqlgram-migrate migrate migrations/*.json
//!
//! # Print the DDL of a manifest for MySQL
//! sqlgram-migrate --dialect mysql ddl migrations/0001_blog.json
//! ```

mod bind;
pub mod error;
pub mod executor;
pub mod history;
pub mod manifest;
pub mod migration;

pub use error::{MigrateError, Result};
pub use executor::{MigrationStatus, Migrator};
pub use history::{AppliedMigration, MigrationHistory, DEFAULT_TABLE};
pub use manifest::Manifest;
pub use migration::Migration;
