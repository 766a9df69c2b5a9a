//! Error types for the migration system.

use std::path::PathBuf;

/// Errors that can occur during migration operations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// Statement or DDL compilation failed.
    #[error("Schema error: {0}")]
    Schema(#[from] sqlgram_core::Error),

    /// Database error during migration execution.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (reading manifest files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to parse a manifest file.
    #[error("Failed to parse manifest '{path}': {message}")]
    Manifest {
        /// Path to the manifest file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Two registered migrations share a name.
    #[error("Migration '{0}' is registered more than once")]
    DuplicateMigration(String),

    /// The history lists a migration that is not registered.
    #[error("Migration '{0}' is recorded as applied but is not registered")]
    UnknownMigration(String),

    /// Invalid migration state.
    #[error("Invalid migration state: {0}")]
    InvalidState(String),
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
