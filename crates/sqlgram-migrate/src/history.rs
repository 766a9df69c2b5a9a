//! Migration history tracking.
//!
//! This module manages the history table recording which migrations have
//! been applied, and in which batch. Statements against it are built with
//! the sqlgram query builder and the table itself with a blueprint.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlgram_core::query::QueryBuilder;
use sqlgram_core::{Row, Schema, SqliteDialect};
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqliteRow};
use sqlx::Row as _;
use tracing::info;

use crate::bind::bind_all;
use crate::error::{MigrateError, Result};

/// Default name of the history table.
pub const DEFAULT_TABLE: &str = "sqlgram_migrations";

/// A record of an applied migration.
#[derive(Debug, Clone)]
pub struct AppliedMigration {
    /// Unique ID in the history table.
    pub id: i64,
    /// Migration name.
    pub name: String,
    /// Batch the migration was applied in.
    pub batch: i64,
    /// When the migration was applied.
    pub applied_at: DateTime<Utc>,
}

/// Manages the migration history in the database.
#[derive(Debug, Clone)]
pub struct MigrationHistory {
    pool: SqlitePool,
    table: String,
}

impl MigrationHistory {
    /// Creates a history manager using [`DEFAULT_TABLE`].
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_table(pool, DEFAULT_TABLE)
    }

    /// Creates a history manager using a custom table name.
    #[must_use]
    pub fn with_table(pool: SqlitePool, table: &str) -> Self {
        Self {
            pool,
            table: String::from(table),
        }
    }

    /// Returns the history table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    fn query(&self) -> QueryBuilder<SqliteDialect> {
        QueryBuilder::sqlite().table(&self.table)
    }

    /// Returns true when the history table exists.
    pub async fn exists(&self) -> Result<bool> {
        let (sql, params) = QueryBuilder::sqlite()
            .table("sqlite_master")
            .select("name")
            .where_(("type", "table"))
            .where_(("name", self.table.as_str()))
            .build()?;
        let row = bind_all(&sql, &params).fetch_optional(&self.pool).await?;
        Ok(row.is_some())
    }

    /// Ensures the history table exists.
    pub async fn ensure_table(&self) -> Result<()> {
        if self.exists().await? {
            return Ok(());
        }

        let statements = {
            let grammar = SqliteDialect::new();
            let mut schema = Schema::new(&grammar);
            schema.create(&self.table, |t| {
                t.id("id");
                t.string("migration").unique();
                t.int("batch");
                t.string("applied_at");
                Ok(())
            })?;
            schema.take_statements()
        };
        for sql in &statements {
            sqlx::query(sql).execute(&self.pool).await?;
        }

        info!(table = %self.table, "Created migration history table");
        Ok(())
    }

    /// Records a migration as applied in `batch`.
    pub async fn record_applied(
        &self,
        conn: &mut SqliteConnection,
        name: &str,
        batch: i64,
    ) -> Result<()> {
        let row = Row::new()
            .with("migration", name)
            .with("batch", batch)
            .with("applied_at", Utc::now().to_rfc3339());
        let (sql, params) = self.query().insert(row)?.build()?;
        bind_all(&sql, &params).execute(&mut *conn).await?;
        Ok(())
    }

    /// Removes a migration record (for rollback).
    pub async fn record_unapplied(&self, conn: &mut SqliteConnection, name: &str) -> Result<()> {
        let (sql, params) = self.query().where_(("migration", name)).delete().build()?;
        let result = bind_all(&sql, &params).execute(&mut *conn).await?;

        if result.rows_affected() == 0 {
            return Err(MigrateError::InvalidState(format!(
                "migration '{name}' is not recorded as applied"
            )));
        }
        Ok(())
    }

    /// Gets all applied migrations in application order.
    pub async fn get_applied(&self) -> Result<Vec<AppliedMigration>> {
        let (sql, params) = self
            .query()
            .select("id")
            .select("migration")
            .select("batch")
            .select("applied_at")
            .order_by("id", sqlgram_core::query::Direction::Asc)
            .build()?;
        let rows = bind_all(&sql, &params).fetch_all(&self.pool).await?;
        rows.iter().map(applied_from_row).collect()
    }

    /// Names of every applied migration.
    pub async fn applied_names(&self) -> Result<HashSet<String>> {
        let (sql, params) = self.query().select("migration").build()?;
        let rows = bind_all(&sql, &params).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("migration").map_err(MigrateError::from))
            .collect()
    }

    /// Highest batch number, 0 when nothing was applied.
    pub async fn last_batch(&self) -> Result<i64> {
        let (sql, params) = self.query().select_as("MAX(batch)", "batch").build()?;
        let row = bind_all(&sql, &params).fetch_one(&self.pool).await?;
        let batch: Option<i64> = row.try_get("batch")?;
        Ok(batch.unwrap_or(0))
    }

    /// Names of the migrations applied in `batch`, most recent first.
    pub async fn batch(&self, batch: i64) -> Result<Vec<String>> {
        let (sql, params) = self
            .query()
            .select("migration")
            .where_(("batch", batch))
            .order_by_desc("id")
            .build()?;
        let rows = bind_all(&sql, &params).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("migration").map_err(MigrateError::from))
            .collect()
    }
}

fn applied_from_row(row: &SqliteRow) -> Result<AppliedMigration> {
    let applied_at: String = row.try_get("applied_at")?;
    let applied_at = DateTime::parse_from_rfc3339(&applied_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            MigrateError::InvalidState(format!("invalid applied_at '{applied_at}': {e}"))
        })?;

    Ok(AppliedMigration {
        id: row.try_get("id")?,
        name: row.try_get("migration")?,
        batch: row.try_get("batch")?,
        applied_at,
    })
}
