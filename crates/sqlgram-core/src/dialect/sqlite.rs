//! SQLite dialect.
//!
//! SQLite has limited ALTER TABLE support: columns can be added and
//! renamed, nothing else. Alter blueprints asking for more are rejected
//! before any statement is produced.

use tracing::warn;

use crate::error::{Error, Result};
use crate::query::Grammar;
use crate::schema::{Blueprint, Column, ColumnType, DefaultValue, SchemaGrammar};

use super::Dialect;

const TYPE_MAP: &[(ColumnType, &str)] = &[
    (ColumnType::Tiny, "INTEGER"),
    (ColumnType::Int, "INTEGER"),
    (ColumnType::BigInt, "INTEGER"),
    (ColumnType::Float, "REAL"),
    (ColumnType::Text, "TEXT"),
    (ColumnType::Char, "TEXT"),
    (ColumnType::Varchar, "TEXT"),
    (ColumnType::Date, "TEXT"),
    (ColumnType::DateTime, "TEXT"),
    (ColumnType::Timestamp, "TEXT"),
    (ColumnType::Time, "TEXT"),
    (ColumnType::Enum, "TEXT"),
];

/// SQLite dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn check_alter(&self, blueprint: &Blueprint) -> Result<()> {
        let table = blueprint.table();
        if let Some(column) = blueprint.columns().iter().find(|c| c.change) {
            return Err(Error::unsupported(
                self.name(),
                format!("changing column '{}' of table '{table}'", column.name),
            ));
        }
        if let Some(name) = blueprint.dropped_columns().first() {
            return Err(Error::unsupported(
                self.name(),
                format!("dropping column '{name}' of table '{table}'"),
            ));
        }
        if !blueprint.foreign_keys().is_empty() {
            return Err(Error::unsupported(
                self.name(),
                format!("adding a foreign key to existing table '{table}'"),
            ));
        }
        if let Some(name) = blueprint.dropped_foreign_keys().first() {
            return Err(Error::unsupported(
                self.name(),
                format!("dropping foreign key '{name}' of table '{table}'"),
            ));
        }
        for column in blueprint.columns() {
            if column.primary || column.unique {
                return Err(Error::unsupported(
                    self.name(),
                    format!("adding PRIMARY KEY or UNIQUE column '{}'", column.name),
                ));
            }
            if column.use_current_on_update {
                return Err(Error::unsupported(self.name(), "ON UPDATE CURRENT_TIMESTAMP"));
            }
            if column.use_current {
                return Err(Error::unsupported(
                    self.name(),
                    format!("adding column '{}' with a CURRENT_TIMESTAMP default", column.name),
                ));
            }
            let has_default = match &column.default {
                Some(DefaultValue::Value(value)) => !value.is_null(),
                Some(DefaultValue::Raw(_)) => true,
                None => false,
            };
            if !column.nullable && !has_default {
                return Err(Error::unsupported(
                    self.name(),
                    format!("adding NOT NULL column '{}' without a default", column.name),
                ));
            }
        }
        Ok(())
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }
}

impl Grammar for SqliteDialect {}

impl SchemaGrammar for SqliteDialect {
    fn type_map(&self) -> &'static [(ColumnType, &'static str)] {
        TYPE_MAP
    }

    fn type_definition(&self, column: &Column) -> Result<String> {
        let native = self.native_type(column.column_type)?;
        if column.column_type != ColumnType::Enum {
            return Ok(String::from(native));
        }
        let values: Vec<String> = column
            .enum_values
            .iter()
            .map(|v| format!("'{}'", self.escape_string(v)))
            .collect();
        Ok(format!(
            "{native} CHECK ({} IN ({}))",
            self.quote_identifier(&column.name),
            values.join(", ")
        ))
    }

    fn autoincrement_definition(&self, column: &Column) -> Result<Option<String>> {
        if !column.primary || !column.column_type.is_integer() {
            return Err(Error::unsupported(
                self.name(),
                format!(
                    "AUTOINCREMENT on '{}' without an integer PRIMARY KEY",
                    column.name
                ),
            ));
        }
        Ok(None)
    }

    fn primary_definition(&self, column: &Column) -> String {
        if column.autoincrement {
            String::from("PRIMARY KEY AUTOINCREMENT")
        } else {
            String::from("PRIMARY KEY")
        }
    }

    fn compile_alter(&self, blueprint: &Blueprint) -> Result<Vec<String>> {
        self.check_alter(blueprint)?;

        let table = blueprint.table();
        let quoted = self.quote_identifier(table);
        let mut statements = Vec::new();

        for column in blueprint.columns() {
            if column.position.is_some() {
                warn!(
                    table,
                    column = column.name.as_str(),
                    "sqlite ignores column placement"
                );
            }
            statements.push(format!(
                "ALTER TABLE {quoted} ADD COLUMN {}",
                self.column_definition(column)?
            ));
            if column.index {
                statements.push(self.create_index(table, &column.name));
            }
        }

        for (from, to) in blueprint.renamed_columns() {
            statements.push(format!(
                "ALTER TABLE {quoted} RENAME COLUMN {} TO {}",
                self.quote_identifier(from),
                self.quote_identifier(to)
            ));
        }

        Ok(statements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tag_is_mapped() {
        let dialect = SqliteDialect::new();
        for tag in ColumnType::ALL {
            assert!(dialect.native_type(tag).is_ok(), "{} is unmapped", tag.as_str());
        }
    }

    #[test]
    fn test_enum_renders_check() {
        let dialect = SqliteDialect::new();
        let mut column = Column::new("role", ColumnType::Enum);
        column.enum_values = vec![String::from("admin"), String::from("user")];
        assert_eq!(
            dialect.type_definition(&column).unwrap(),
            "TEXT CHECK (\"role\" IN ('admin', 'user'))"
        );
    }

    #[test]
    fn test_autoincrement_requires_primary() {
        let dialect = SqliteDialect::new();
        let mut column = Column::new("counter", ColumnType::Int);
        column.autoincrement();
        let err = dialect.column_definition(&column).unwrap_err();
        assert!(err.is_unsupported());

        column.primary();
        assert_eq!(
            dialect.column_definition(&column).unwrap(),
            "\"counter\" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT"
        );
    }

    #[test]
    fn test_no_unsigned_or_length() {
        let dialect = SqliteDialect::new();
        let mut column = Column::new("age", ColumnType::Tiny);
        column.unsigned().length(3).nullable();
        assert_eq!(
            dialect.column_definition(&column).unwrap(),
            "\"age\" INTEGER NULL"
        );
    }

    #[test]
    fn test_on_update_is_unsupported() {
        let dialect = SqliteDialect::new();
        let mut column = Column::new("updated", ColumnType::Timestamp);
        column.use_current().use_current_on_update();
        assert!(dialect.column_definition(&column).unwrap_err().is_unsupported());
    }
}
