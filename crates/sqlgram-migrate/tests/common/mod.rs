#![allow(dead_code)]

use std::io::Write;

use sqlgram_core::Schema;
use sqlgram_migrate::Migration;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tempfile::NamedTempFile;

/// Single-connection in-memory database, so every query sees the same data.
pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool")
}

pub async fn table_exists(pool: &SqlitePool, table: &str) -> bool {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_optional(pool)
            .await
            .expect("Failed to query sqlite_master");
    row.is_some()
}

pub async fn column_names(pool: &SqlitePool, table: &str) -> Vec<String> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT name FROM pragma_table_info(?) ORDER BY cid")
        .bind(table)
        .fetch_all(pool)
        .await
        .expect("Failed to read table info");
    rows.into_iter().map(|row| row.0).collect()
}

pub fn manifest_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(json.as_bytes())
        .expect("Failed to write manifest");
    file
}

pub struct CreateUsers;

impl Migration for CreateUsers {
    fn name(&self) -> &str {
        "0001_create_users"
    }

    fn up(&self, schema: &mut Schema<'_>) -> sqlgram_core::Result<()> {
        schema.create("users", |t| {
            t.id("id");
            t.string("email").unique();
            t.timestamps();
            Ok(())
        })
    }

    fn down(&self, schema: &mut Schema<'_>) -> sqlgram_core::Result<()> {
        schema.drop("users");
        Ok(())
    }
}

pub struct CreatePosts;

impl Migration for CreatePosts {
    fn name(&self) -> &str {
        "0002_create_posts"
    }

    fn up(&self, schema: &mut Schema<'_>) -> sqlgram_core::Result<()> {
        schema.create("posts", |t| {
            t.id("id");
            t.int("users_id");
            t.string("title").index();
            t.foreign_guessed().on("users").on_delete("cascade")?;
            Ok(())
        })
    }

    fn down(&self, schema: &mut Schema<'_>) -> sqlgram_core::Result<()> {
        schema.drop("posts");
        Ok(())
    }
}

pub struct RenameEmail;

impl Migration for RenameEmail {
    fn name(&self) -> &str {
        "0003_rename_email"
    }

    fn up(&self, schema: &mut Schema<'_>) -> sqlgram_core::Result<()> {
        schema.table("users", |t| {
            t.rename_column("email", "contact");
            Ok(())
        })
    }

    fn down(&self, schema: &mut Schema<'_>) -> sqlgram_core::Result<()> {
        schema.table("users", |t| {
            t.rename_column("contact", "email");
            Ok(())
        })
    }
}
