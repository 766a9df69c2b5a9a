//! Error types for query and schema compilation.

use thiserror::Error;

/// Errors raised while configuring builders or compiling SQL.
#[derive(Debug, Error)]
pub enum Error {
    /// A multi-row insert whose rows do not share the same columns.
    #[error("insert row {row} has columns [{found}], expected [{expected}]")]
    MismatchedRowColumns {
        /// Zero-based index of the offending row.
        row: usize,
        /// Columns of the first row.
        expected: String,
        /// Columns of the offending row.
        found: String,
    },

    /// An update without any assignment.
    #[error("update requires at least one column assignment")]
    EmptyUpdate,

    /// A statement was built before a table was set.
    #[error("no table set on the query builder")]
    MissingTable,

    /// An ON DELETE / ON UPDATE action outside the supported set.
    #[error("invalid foreign key action '{0}' (expected RESTRICT, CASCADE, SET NULL, NO ACTION or SET DEFAULT)")]
    InvalidForeignKeyAction(String),

    /// A foreign key that is missing its referenced table.
    #[error("foreign key '{name}' on table '{table}' has no referenced table")]
    IncompleteForeignKey {
        /// Constraint name.
        name: String,
        /// Owning table.
        table: String,
    },

    /// The target dialect cannot express the requested DDL.
    #[error("{feature} is not supported by the {dialect} dialect")]
    Unsupported {
        /// Dialect name.
        dialect: &'static str,
        /// Description of the rejected feature.
        feature: String,
    },

    /// Foreign key owning-column inference failed.
    #[error("cannot guess the owning column of foreign key '{constraint}': {reason}")]
    GuessFailed {
        /// Constraint name that was parsed.
        constraint: String,
        /// Why the guess failed.
        reason: String,
    },

    /// A column type without an entry in the dialect's type map.
    #[error("column type '{column_type}' has no mapping in the {dialect} dialect")]
    UnmappedType {
        /// Dialect name.
        dialect: &'static str,
        /// Type tag that was looked up.
        column_type: &'static str,
    },

    /// Error reported by the driver executing a compiled statement.
    #[error("driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Creates an unsupported-operation error.
    pub fn unsupported(dialect: &'static str, feature: impl Into<String>) -> Self {
        Self::Unsupported {
            dialect,
            feature: feature.into(),
        }
    }

    /// Wraps a driver error.
    pub fn driver(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Driver(err.into())
    }

    /// Returns true for errors raised by a misconfigured builder call.
    #[must_use]
    pub const fn is_logic_error(&self) -> bool {
        matches!(
            self,
            Self::MismatchedRowColumns { .. }
                | Self::EmptyUpdate
                | Self::MissingTable
                | Self::InvalidForeignKeyAction(_)
                | Self::IncompleteForeignKey { .. }
        )
    }

    /// Returns true when the dialect rejected the requested DDL.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

/// Result type alias for builder and grammar operations.
pub type Result<T> = std::result::Result<T, Error>;
