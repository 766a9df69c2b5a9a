//! DDL rendering of blueprints.

use crate::dialect::Dialect;
use crate::error::{Error, Result};

use super::blueprint::Blueprint;
use super::column::{Column, ColumnType, DefaultValue};
use super::foreign_key::{resolve_owning_column, ForeignKey};

/// Trait for dialect-specific DDL generation.
///
/// The column definition is assembled in a fixed order: name, type,
/// unsigned, nullability, default, autoincrement, unique, primary key.
/// Indexes are emitted at table level through
/// [`inline_indexes`](Self::inline_indexes).
pub trait SchemaGrammar: Dialect {
    /// Native type names, one entry per supported tag.
    fn type_map(&self) -> &'static [(ColumnType, &'static str)];

    /// Looks up the native name of a tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnmappedType`] when the tag has no entry.
    fn native_type(&self, column_type: ColumnType) -> Result<&'static str> {
        self.type_map()
            .iter()
            .find(|(tag, _)| *tag == column_type)
            .map(|(_, name)| *name)
            .ok_or(Error::UnmappedType {
                dialect: self.name(),
                column_type: column_type.as_str(),
            })
    }

    /// Renders the type of a column, including length or enum values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnmappedType`] for an unmapped tag.
    fn type_definition(&self, column: &Column) -> Result<String>;

    /// Keyword rendered for `unsigned` columns, if the dialect has one.
    fn unsigned_keyword(&self) -> Option<&'static str> {
        None
    }

    /// Renders the autoincrement part of a column definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] when the dialect cannot express it.
    fn autoincrement_definition(&self, column: &Column) -> Result<Option<String>>;

    /// Renders the primary key part of a column definition.
    fn primary_definition(&self, _column: &Column) -> String {
        String::from("PRIMARY KEY")
    }

    /// Renders `ON UPDATE CURRENT_TIMESTAMP`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] by default.
    fn on_update_definition(&self) -> Result<String> {
        Err(Error::unsupported(self.name(), "ON UPDATE CURRENT_TIMESTAMP"))
    }

    /// Whether indexes are table elements of CREATE TABLE (`true`) or
    /// separate CREATE INDEX statements (`false`).
    fn inline_indexes(&self) -> bool {
        false
    }

    /// Renders a full column definition.
    ///
    /// # Errors
    ///
    /// Propagates type mapping and unsupported-feature errors.
    fn column_definition(&self, column: &Column) -> Result<String> {
        let mut parts = vec![
            self.quote_identifier(&column.name),
            self.type_definition(column)?,
        ];

        if column.unsigned {
            if let Some(keyword) = self.unsigned_keyword() {
                parts.push(String::from(keyword));
            }
        }

        parts.push(String::from(if column.nullable { "NULL" } else { "NOT NULL" }));

        if column.use_current {
            parts.push(String::from("DEFAULT CURRENT_TIMESTAMP"));
        } else if let Some(default) = &column.default {
            let rendered = match default {
                DefaultValue::Value(value) => self.escape(value),
                DefaultValue::Raw(sql) => sql.clone(),
            };
            parts.push(format!("DEFAULT {rendered}"));
        }
        if column.use_current_on_update {
            parts.push(self.on_update_definition()?);
        }

        if column.autoincrement {
            if let Some(definition) = self.autoincrement_definition(column)? {
                parts.push(definition);
            }
        }

        if column.unique {
            parts.push(String::from("UNIQUE"));
        }

        if column.primary {
            parts.push(self.primary_definition(column));
        }

        Ok(parts.join(" "))
    }

    /// Name of the single-column index on `column`.
    fn index_name(&self, table: &str, column: &str) -> String {
        format!("{table}_{column}_index")
    }

    /// Renders a standalone CREATE INDEX.
    fn create_index(&self, table: &str, column: &str) -> String {
        format!(
            "CREATE INDEX {} ON {} ({})",
            self.quote_identifier(&self.index_name(table, column)),
            self.quote_identifier(table),
            self.quote_identifier(column)
        )
    }

    /// Renders `CONSTRAINT ... FOREIGN KEY ... REFERENCES ...`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteForeignKey`] without a referenced table and
    /// [`Error::GuessFailed`] when the owning column cannot be resolved.
    fn foreign_key_definition(
        &self,
        blueprint: &Blueprint,
        foreign_key: &ForeignKey,
    ) -> Result<String> {
        let referenced = foreign_key
            .referenced_table
            .as_deref()
            .ok_or_else(|| Error::IncompleteForeignKey {
                name: foreign_key.constraint_name(),
                table: String::from(blueprint.table()),
            })?;
        let column = resolve_owning_column(foreign_key, blueprint.columns())?;

        let mut sql = format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.quote_identifier(&foreign_key.constraint_name()),
            self.quote_identifier(&column),
            self.quote_identifier(referenced),
            self.quote_identifier(&foreign_key.referenced_column)
        );
        if let Some(action) = foreign_key.on_delete {
            sql.push_str(" ON DELETE ");
            sql.push_str(action.as_sql());
        }
        if let Some(action) = foreign_key.on_update {
            sql.push_str(" ON UPDATE ");
            sql.push_str(action.as_sql());
        }
        Ok(sql)
    }

    /// Compiles a CREATE TABLE plus any trailing statements.
    ///
    /// # Errors
    ///
    /// Propagates column, foreign key and type mapping errors.
    fn compile_create(&self, blueprint: &Blueprint) -> Result<Vec<String>> {
        if blueprint.has_alter_actions() {
            tracing::warn!(
                table = blueprint.table(),
                "alter-only actions are ignored when creating a table"
            );
        }

        let table = blueprint.table();
        let mut elements = Vec::with_capacity(blueprint.columns().len());
        for column in blueprint.columns() {
            elements.push(self.column_definition(column)?);
        }

        let indexed = blueprint.columns().iter().filter(|c| c.index);
        let mut trailing = Vec::new();
        if self.inline_indexes() {
            for column in indexed {
                elements.push(format!(
                    "INDEX {} ({})",
                    self.quote_identifier(&self.index_name(table, &column.name)),
                    self.quote_identifier(&column.name)
                ));
            }
        } else {
            trailing.extend(indexed.map(|c| self.create_index(table, &c.name)));
        }

        for foreign_key in blueprint.foreign_keys() {
            elements.push(self.foreign_key_definition(blueprint, foreign_key)?);
        }

        let mut statements = vec![format!(
            "CREATE TABLE {} ({})",
            self.quote_identifier(table),
            elements.join(", ")
        )];
        statements.extend(trailing);
        Ok(statements)
    }

    /// Compiles the statements altering an existing table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] for actions the dialect cannot express,
    /// before any statement is produced.
    fn compile_alter(&self, blueprint: &Blueprint) -> Result<Vec<String>>;

    /// Compiles `DROP TABLE`.
    fn compile_drop(&self, table: &str) -> String {
        format!("DROP TABLE {}", self.quote_identifier(table))
    }

    /// Compiles `DROP TABLE IF EXISTS`.
    fn compile_drop_if_exists(&self, table: &str) -> String {
        format!("DROP TABLE IF EXISTS {}", self.quote_identifier(table))
    }

    /// Compiles a table rename.
    fn compile_rename(&self, from: &str, to: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME TO {}",
            self.quote_identifier(from),
            self.quote_identifier(to)
        )
    }
}
