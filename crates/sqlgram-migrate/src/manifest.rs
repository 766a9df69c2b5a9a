//! JSON table manifests.
//!
//! A manifest describes one migration creating a set of tables:
//!
//! ```json
//! {
//!   "name": "0001_blog",
//!   "tables": [
//!     {
//!       "name": "posts",
//!       "columns": [
//!         { "name": "id", "type": "id" },
//!         { "name": "title", "type": "string", "index": true },
//!         { "name": "users_id", "type": "int", "unsigned": true }
//!       ],
//!       "foreign_keys": [{ "on": "users", "on_delete": "cascade" }],
//!       "timestamps": true
//!     }
//!   ]
//! }
//! ```
//!
//! A foreign key without `column` has its owning column guessed from the
//! constraint name.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sqlgram_core::schema::{Blueprint, Column, SchemaGrammar};
use sqlgram_core::{Schema, SqlValue};

use crate::error::{MigrateError, Result};
use crate::migration::Migration;

/// A named migration creating the listed tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Migration name.
    pub name: String,
    /// Tables, created in order and dropped in reverse.
    #[serde(default)]
    pub tables: Vec<TableManifest>,
}

/// One table of a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableManifest {
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    /// Foreign keys of the table.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeySpec>,
    /// Adds `created` / `updated` timestamps.
    #[serde(default)]
    pub timestamps: bool,
    /// Adds a nullable `deleted` timestamp.
    #[serde(default)]
    pub soft_deletes: bool,
}

/// Column factory selected by the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Auto-incrementing primary key.
    Id,
    /// Tiny integer.
    Tiny,
    /// Integer.
    Int,
    /// 64-bit integer.
    BigInt,
    /// Floating point.
    Float,
    /// Unbounded text.
    Text,
    /// Fixed-length string, 1 unless `length` is set.
    Char,
    /// `VARCHAR(255)`.
    String,
    /// Variable-length string, 255 unless `length` is set.
    Varchar,
    /// Date only.
    Date,
    /// Date and time.
    DateTime,
    /// Timestamp.
    Timestamp,
    /// Time only.
    Time,
    /// One of `values`.
    Enum,
}

/// A column of a table manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Column factory.
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    /// Length or precision.
    #[serde(default)]
    pub length: Option<u32>,
    /// Integer without sign.
    #[serde(default)]
    pub unsigned: bool,
    /// Adds a unique index.
    #[serde(default)]
    pub unique: bool,
    /// Allows NULL.
    #[serde(default)]
    pub nullable: bool,
    /// Default value, escaped by the dialect.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    /// Default embedded verbatim.
    #[serde(default)]
    pub default_raw: Option<String>,
    /// Defaults to `CURRENT_TIMESTAMP`.
    #[serde(default)]
    pub use_current: bool,
    /// Sets to `CURRENT_TIMESTAMP` on every update.
    #[serde(default)]
    pub use_current_on_update: bool,
    /// Auto-incrementing integer.
    #[serde(default)]
    pub autoincrement: bool,
    /// Part of the primary key.
    #[serde(default)]
    pub primary: bool,
    /// Adds a single-column index.
    #[serde(default)]
    pub index: bool,
    /// Allowed values of an `enum` column.
    #[serde(default)]
    pub values: Vec<String>,
}

/// A foreign key of a table manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeySpec {
    /// Owning column; guessed when absent.
    #[serde(default)]
    pub column: Option<String>,
    /// Explicit constraint name.
    #[serde(default)]
    pub name: Option<String>,
    /// Referenced table.
    pub on: String,
    /// Referenced column, `id` by default.
    #[serde(default = "default_references")]
    pub references: String,
    /// ON DELETE action by SQL name.
    #[serde(default)]
    pub on_delete: Option<String>,
    /// ON UPDATE action by SQL name.
    #[serde(default)]
    pub on_update: Option<String>,
}

fn default_references() -> String {
    String::from("id")
}

impl Manifest {
    /// Parses a manifest from JSON text.
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a manifest file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| MigrateError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Compiles the CREATE statements for a dialect without executing them.
    pub fn compile(&self, grammar: &dyn SchemaGrammar) -> Result<Vec<String>> {
        let mut schema = Schema::new(grammar);
        self.up(&mut schema)?;
        Ok(schema.take_statements())
    }
}

impl Migration for Manifest {
    fn name(&self) -> &str {
        &self.name
    }

    fn up(&self, schema: &mut Schema<'_>) -> sqlgram_core::Result<()> {
        for table in &self.tables {
            schema.create(&table.name, |blueprint| table.fill(blueprint))?;
        }
        Ok(())
    }

    fn down(&self, schema: &mut Schema<'_>) -> sqlgram_core::Result<()> {
        for table in self.tables.iter().rev() {
            schema.drop_if_exists(&table.name);
        }
        Ok(())
    }
}

impl TableManifest {
    /// Declares the table's columns and constraints on a blueprint.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid foreign key action.
    pub fn fill(&self, blueprint: &mut Blueprint) -> sqlgram_core::Result<()> {
        for spec in &self.columns {
            spec.apply(blueprint);
        }
        if self.timestamps {
            blueprint.timestamps();
        }
        if self.soft_deletes {
            blueprint.soft_deletes();
        }

        for spec in &self.foreign_keys {
            let foreign_key = match &spec.column {
                Some(column) => blueprint.foreign(column),
                None => blueprint.foreign_guessed(),
            };
            foreign_key.on(&spec.on).references(&spec.references);
            if let Some(name) = &spec.name {
                foreign_key.name(name);
            }
            if let Some(action) = &spec.on_delete {
                foreign_key.on_delete(action)?;
            }
            if let Some(action) = &spec.on_update {
                foreign_key.on_update(action)?;
            }
        }
        Ok(())
    }
}

impl ColumnSpec {
    fn apply(&self, blueprint: &mut Blueprint) {
        let name = self.name.as_str();
        let column = match self.kind {
            ColumnKind::Id => blueprint.id(name),
            ColumnKind::Tiny => blueprint.tiny(name),
            ColumnKind::Int => blueprint.int(name),
            ColumnKind::BigInt => blueprint.big_int(name),
            ColumnKind::Float => blueprint.float(name),
            ColumnKind::Text => blueprint.text(name),
            ColumnKind::Char => blueprint.char(name, self.length.unwrap_or(1)),
            ColumnKind::String => blueprint.string(name),
            ColumnKind::Varchar => blueprint.varchar(name, self.length.unwrap_or(255)),
            ColumnKind::Date => blueprint.date(name),
            ColumnKind::DateTime => blueprint.date_time(name),
            ColumnKind::Timestamp => blueprint.timestamp(name),
            ColumnKind::Time => blueprint.time(name),
            ColumnKind::Enum => {
                let values: Vec<&str> = self.values.iter().map(String::as_str).collect();
                blueprint.enumeration(name, &values)
            }
        };
        self.modify(column);
    }

    fn modify(&self, column: &mut Column) {
        if let Some(length) = self.length {
            column.length(length);
        }
        if self.unsigned {
            column.unsigned();
        }
        if self.unique {
            column.unique();
        }
        if self.nullable {
            column.nullable();
        }
        if let Some(value) = &self.default {
            column.default(json_to_sql_value(value));
        }
        if let Some(sql) = &self.default_raw {
            column.default_raw(sql);
        }
        if self.use_current {
            column.use_current();
        }
        if self.use_current_on_update {
            column.use_current_on_update();
        }
        if self.autoincrement {
            column.autoincrement();
        }
        if self.primary {
            column.primary();
        }
        if self.index {
            column.index();
        }
    }
}

fn json_to_sql_value(value: &serde_json::Value) -> SqlValue {
    match value {
        serde_json::Value::Null => SqlValue::Null,
        serde_json::Value::Bool(b) => SqlValue::Bool(*b),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(SqlValue::Int)
            .or_else(|| n.as_f64().map(SqlValue::Float))
            .unwrap_or(SqlValue::Null),
        serde_json::Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}
