//! Applies and reverts registered migrations in batches.

use std::collections::{HashMap, HashSet};

use sqlgram_core::schema::SchemaGrammar;
use sqlgram_core::Schema;
use sqlx::sqlite::SqlitePool;
use tracing::{debug, info};

use crate::error::{MigrateError, Result};
use crate::history::MigrationHistory;
use crate::migration::Migration;

/// Applied state of a registered migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Migration name.
    pub name: String,
    /// Batch the migration was applied in, `None` while pending.
    pub batch: Option<i64>,
}

impl MigrationStatus {
    /// Whether the migration has been applied.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        self.batch.is_some()
    }
}

/// Runs registered migrations against a SQLite database.
///
/// Each `run` applies every pending migration, in registration order, as
/// one batch. `rollback` reverts the most recent batch in reverse order.
/// Every migration executes inside its own transaction together with its
/// history record.
pub struct Migrator<G: SchemaGrammar> {
    pool: SqlitePool,
    grammar: G,
    history: MigrationHistory,
    migrations: Vec<Box<dyn Migration>>,
}

impl<G: SchemaGrammar> Migrator<G> {
    /// Creates a migrator with the default history table.
    pub fn new(pool: SqlitePool, grammar: G) -> Self {
        let history = MigrationHistory::new(pool.clone());
        Self {
            pool,
            grammar,
            history,
            migrations: Vec::new(),
        }
    }

    /// Uses a custom history table.
    #[must_use]
    pub fn with_table(mut self, table: &str) -> Self {
        self.history = MigrationHistory::with_table(self.pool.clone(), table);
        self
    }

    /// Registers a migration. Registration order is application order.
    #[must_use]
    pub fn register(mut self, migration: impl Migration + 'static) -> Self {
        self.migrations.push(Box::new(migration));
        self
    }

    /// Returns the migration history.
    #[must_use]
    pub const fn history(&self) -> &MigrationHistory {
        &self.history
    }

    /// Returns the schema grammar.
    #[must_use]
    pub const fn grammar(&self) -> &G {
        &self.grammar
    }

    /// Creates the history table if it does not exist.
    pub async fn install(&self) -> Result<()> {
        self.history.ensure_table().await
    }

    /// Applies every pending migration as a new batch.
    ///
    /// Returns the names of the applied migrations, empty when nothing was
    /// pending.
    pub async fn run(&self) -> Result<Vec<String>> {
        self.check_duplicates()?;
        self.install().await?;

        let applied = self.history.applied_names().await?;
        let pending = self.pending(&applied);
        if pending.is_empty() {
            info!("Nothing to migrate");
            return Ok(Vec::new());
        }

        let batch = self.history.last_batch().await? + 1;
        let mut ran = Vec::with_capacity(pending.len());
        for migration in pending {
            info!(name = %migration.name(), batch, "Applying migration");
            let statements = self.compile(|schema| migration.up(schema))?;
            self.execute(&statements, migration.name(), Some(batch))
                .await?;
            ran.push(migration.name().to_string());
        }

        info!(batch, count = ran.len(), "Batch applied");
        Ok(ran)
    }

    /// Reverts the most recent batch, newest migration first.
    ///
    /// Returns the names of the reverted migrations.
    pub async fn rollback(&self) -> Result<Vec<String>> {
        self.check_duplicates()?;
        if !self.history.exists().await? {
            info!("Nothing to roll back");
            return Ok(Vec::new());
        }

        let batch = self.history.last_batch().await?;
        if batch == 0 {
            info!("Nothing to roll back");
            return Ok(Vec::new());
        }

        let migrations = self
            .history
            .batch(batch)
            .await?
            .into_iter()
            .map(|name| {
                self.find(&name)
                    .ok_or(MigrateError::UnknownMigration(name))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut reverted = Vec::with_capacity(migrations.len());
        for migration in migrations {
            info!(name = %migration.name(), batch, "Rolling back migration");
            let statements = self.compile(|schema| migration.down(schema))?;
            self.execute(&statements, migration.name(), None).await?;
            reverted.push(migration.name().to_string());
        }

        info!(batch, count = reverted.len(), "Batch rolled back");
        Ok(reverted)
    }

    /// Reports every registered migration with its batch, if applied.
    pub async fn status(&self) -> Result<Vec<MigrationStatus>> {
        let batches: HashMap<String, i64> = if self.history.exists().await? {
            self.history
                .get_applied()
                .await?
                .into_iter()
                .map(|applied| (applied.name, applied.batch))
                .collect()
        } else {
            HashMap::new()
        };

        Ok(self
            .migrations
            .iter()
            .map(|migration| MigrationStatus {
                name: migration.name().to_string(),
                batch: batches.get(migration.name()).copied(),
            })
            .collect())
    }

    /// Compiles the statements `run` would execute, without executing them.
    ///
    /// The history table is not created when missing.
    pub async fn pretend(&self) -> Result<Vec<(String, Vec<String>)>> {
        self.check_duplicates()?;
        let applied = if self.history.exists().await? {
            self.history.applied_names().await?
        } else {
            HashSet::new()
        };

        self.pending(&applied)
            .into_iter()
            .map(|migration| {
                let statements = self.compile(|schema| migration.up(schema))?;
                Ok((migration.name().to_string(), statements))
            })
            .collect()
    }

    fn pending(&self, applied: &HashSet<String>) -> Vec<&dyn Migration> {
        self.migrations
            .iter()
            .map(Box::as_ref)
            .filter(|migration| !applied.contains(migration.name()))
            .collect()
    }

    fn find(&self, name: &str) -> Option<&dyn Migration> {
        self.migrations
            .iter()
            .map(Box::as_ref)
            .find(|migration| migration.name() == name)
    }

    fn check_duplicates(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for migration in &self.migrations {
            if !seen.insert(migration.name()) {
                return Err(MigrateError::DuplicateMigration(
                    migration.name().to_string(),
                ));
            }
        }
        Ok(())
    }

    fn compile(
        &self,
        describe: impl FnOnce(&mut Schema<'_>) -> sqlgram_core::Result<()>,
    ) -> Result<Vec<String>> {
        let mut schema = Schema::new(&self.grammar);
        describe(&mut schema)?;
        Ok(schema.take_statements())
    }

    /// Executes `statements` and records (`Some(batch)`) or erases (`None`)
    /// the history entry in one transaction.
    async fn execute(&self, statements: &[String], name: &str, batch: Option<i64>) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for sql in statements {
            debug!(sql = %sql, "Executing SQL");
            sqlx::query(sql).execute(&mut *tx).await?;
        }
        match batch {
            Some(batch) => self.history.record_applied(&mut tx, name, batch).await?,
            None => self.history.record_unapplied(&mut tx, name).await?,
        }
        tx.commit().await?;
        Ok(())
    }
}
