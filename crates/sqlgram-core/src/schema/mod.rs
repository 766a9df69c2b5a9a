//! Schema blueprints and DDL compilation.
//!
//! [`Schema`] is the entry point used by migration code: each call builds a
//! [`Blueprint`], lets the caller fill it, compiles it with the active
//! [`SchemaGrammar`] and records the resulting statements.
//!
//! ```rust
//! use sqlgram_core::dialect::SqliteDialect;
//! use sqlgram_core::schema::Schema;
//!
//! let grammar = SqliteDialect::new();
//! let mut schema = Schema::new(&grammar);
//! schema
//!     .create("users", |table| {
//!         table.id("id");
//!         table.string("email").unique();
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! assert_eq!(
//!     schema.statements()[0],
//!     "CREATE TABLE \"users\" (\"id\" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT, \
//!      \"email\" TEXT NOT NULL UNIQUE)"
//! );
//! ```

mod blueprint;
mod column;
mod foreign_key;
mod grammar;

pub use blueprint::Blueprint;
pub use column::{Column, ColumnType, DefaultValue, Position};
pub use foreign_key::{resolve_owning_column, ForeignKey, ForeignKeyAction};
pub use grammar::SchemaGrammar;

use tracing::debug;

use crate::error::Result;

/// Records DDL compiled by a schema grammar.
pub struct Schema<'g> {
    grammar: &'g dyn SchemaGrammar,
    statements: Vec<String>,
}

impl<'g> Schema<'g> {
    /// Creates a schema recorder for the given grammar.
    #[must_use]
    pub fn new(grammar: &'g dyn SchemaGrammar) -> Self {
        Self {
            grammar,
            statements: Vec::new(),
        }
    }

    /// Returns the name of the active dialect.
    #[must_use]
    pub fn dialect(&self) -> &'static str {
        self.grammar.name()
    }

    /// Creates a table described by `build`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the callback and from compilation. Nothing is
    /// recorded on failure.
    pub fn create<F>(&mut self, table: &str, build: F) -> Result<()>
    where
        F: FnOnce(&mut Blueprint) -> Result<()>,
    {
        let mut blueprint = Blueprint::new(table);
        build(&mut blueprint)?;
        let statements = self.grammar.compile_create(&blueprint)?;
        self.record(statements);
        Ok(())
    }

    /// Alters an existing table as described by `build`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the callback and from compilation. Nothing is
    /// recorded on failure.
    pub fn table<F>(&mut self, table: &str, build: F) -> Result<()>
    where
        F: FnOnce(&mut Blueprint) -> Result<()>,
    {
        let mut blueprint = Blueprint::alter(table);
        build(&mut blueprint)?;
        let statements = self.grammar.compile_alter(&blueprint)?;
        self.record(statements);
        Ok(())
    }

    /// Drops a table.
    pub fn drop(&mut self, table: &str) {
        let sql = self.grammar.compile_drop(table);
        self.record(vec![sql]);
    }

    /// Drops a table if it exists.
    pub fn drop_if_exists(&mut self, table: &str) {
        let sql = self.grammar.compile_drop_if_exists(table);
        self.record(vec![sql]);
    }

    /// Renames a table.
    pub fn rename(&mut self, from: &str, to: &str) {
        let sql = self.grammar.compile_rename(from, to);
        self.record(vec![sql]);
    }

    /// Statements recorded so far.
    #[must_use]
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Takes the recorded statements, leaving the recorder empty.
    pub fn take_statements(&mut self) -> Vec<String> {
        std::mem::take(&mut self.statements)
    }

    fn record(&mut self, statements: Vec<String>) {
        for sql in &statements {
            debug!(dialect = self.grammar.name(), sql = %sql, "compiled ddl");
        }
        self.statements.extend(statements);
    }
}

impl std::fmt::Debug for Schema<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("dialect", &self.grammar.name())
            .field("statements", &self.statements)
            .finish()
    }
}
