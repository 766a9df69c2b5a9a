//! Declarative table descriptions.
//!
//! A [`Blueprint`] is filled inside the callback handed to
//! [`Schema::create`](super::Schema::create) or
//! [`Schema::table`](super::Schema::table). Column factories return the new
//! [`Column`] so modifiers can be chained:
//!
//! ```rust
//! use sqlgram_core::schema::Blueprint;
//!
//! let mut table = Blueprint::new("users");
//! table.id("id");
//! table.string("email").unique();
//! table.int("age").unsigned().nullable();
//! table.soft_deletes();
//!
//! assert_eq!(table.columns().len(), 4);
//! ```

use super::column::{Column, ColumnType};
use super::foreign_key::ForeignKey;

/// A table being created or altered.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    table: String,
    alter: bool,
    columns: Vec<Column>,
    foreign_keys: Vec<ForeignKey>,
    drop_columns: Vec<String>,
    drop_foreign_keys: Vec<String>,
    renames: Vec<(String, String)>,
}

impl Blueprint {
    /// Creates a blueprint for a new table.
    #[must_use]
    pub fn new(table: &str) -> Self {
        Self {
            table: String::from(table),
            alter: false,
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            drop_columns: Vec::new(),
            drop_foreign_keys: Vec::new(),
            renames: Vec::new(),
        }
    }

    /// Creates a blueprint altering an existing table.
    #[must_use]
    pub fn alter(table: &str) -> Self {
        Self {
            alter: true,
            ..Self::new(table)
        }
    }

    /// Table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns true when altering an existing table.
    #[must_use]
    pub const fn is_alter(&self) -> bool {
        self.alter
    }

    /// Columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Declared foreign keys.
    #[must_use]
    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Columns to drop.
    #[must_use]
    pub fn dropped_columns(&self) -> &[String] {
        &self.drop_columns
    }

    /// Foreign key constraints to drop.
    #[must_use]
    pub fn dropped_foreign_keys(&self) -> &[String] {
        &self.drop_foreign_keys
    }

    /// Column renames as `(from, to)` pairs.
    #[must_use]
    pub fn renamed_columns(&self) -> &[(String, String)] {
        &self.renames
    }

    /// Adds a column descriptor.
    pub fn add_column(&mut self, column: Column) -> &mut Column {
        self.columns.push(column);
        let last = self.columns.len() - 1;
        &mut self.columns[last]
    }

    fn column(&mut self, name: &str, column_type: ColumnType) -> &mut Column {
        self.add_column(Column::new(name, column_type))
    }

    /// Unsigned auto-incrementing primary key, `INT(11)` on MySQL.
    pub fn id(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Int)
            .length(11)
            .unsigned()
            .primary()
            .autoincrement()
    }

    /// Tiny integer column.
    pub fn tiny(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Tiny)
    }

    /// Integer column.
    pub fn int(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Int)
    }

    /// 64-bit integer column.
    pub fn big_int(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::BigInt)
    }

    /// Floating point column.
    pub fn float(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Float)
    }

    /// Unbounded text column.
    pub fn text(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Text)
    }

    /// Fixed-length string column.
    pub fn char(&mut self, name: &str, length: u32) -> &mut Column {
        self.column(name, ColumnType::Char).length(length)
    }

    /// `VARCHAR(255)`.
    pub fn string(&mut self, name: &str) -> &mut Column {
        self.varchar(name, 255)
    }

    /// Variable-length string column.
    pub fn varchar(&mut self, name: &str, length: u32) -> &mut Column {
        self.column(name, ColumnType::Varchar).length(length)
    }

    /// Date column.
    pub fn date(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Date)
    }

    /// Date and time column.
    pub fn date_time(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::DateTime)
    }

    /// Timestamp column.
    pub fn timestamp(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Timestamp)
    }

    /// Time column.
    pub fn time(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Time)
    }

    /// Column restricted to `values`.
    pub fn enumeration(&mut self, name: &str, values: &[&str]) -> &mut Column {
        let column = self.column(name, ColumnType::Enum);
        column.enum_values = values.iter().map(|v| String::from(*v)).collect();
        column
    }

    /// `created` and `updated` timestamps defaulting to the current time.
    pub fn timestamps(&mut self) {
        self.timestamp("created").use_current();
        self.timestamp("updated").use_current();
    }

    /// Nullable `deleted` timestamp.
    pub fn soft_deletes(&mut self) -> &mut Column {
        self.timestamp("deleted").nullable()
    }

    /// Declares a foreign key owned by `column`.
    pub fn foreign(&mut self, column: &str) -> &mut ForeignKey {
        self.push_foreign(ForeignKey::new(&self.table, Some(column)))
    }

    /// Declares a foreign key whose owning column is guessed from the
    /// constraint name when the statement is compiled.
    pub fn foreign_guessed(&mut self) -> &mut ForeignKey {
        self.push_foreign(ForeignKey::new(&self.table, None))
    }

    fn push_foreign(&mut self, foreign_key: ForeignKey) -> &mut ForeignKey {
        self.foreign_keys.push(foreign_key);
        let last = self.foreign_keys.len() - 1;
        &mut self.foreign_keys[last]
    }

    /// Drops a column.
    pub fn drop_column(&mut self, name: &str) {
        self.drop_columns.push(String::from(name));
    }

    /// Drops a foreign key by constraint name.
    pub fn drop_foreign(&mut self, name: &str) {
        self.drop_foreign_keys.push(String::from(name));
    }

    /// Renames a column.
    pub fn rename_column(&mut self, from: &str, to: &str) {
        self.renames.push((String::from(from), String::from(to)));
    }

    /// Returns true when the blueprint carries alter-only actions.
    #[must_use]
    pub fn has_alter_actions(&self) -> bool {
        !self.drop_columns.is_empty()
            || !self.drop_foreign_keys.is_empty()
            || !self.renames.is_empty()
            || self.columns.iter().any(|c| c.change)
    }

    /// Returns true when nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
            && self.foreign_keys.is_empty()
            && self.drop_columns.is_empty()
            && self.drop_foreign_keys.is_empty()
            && self.renames.is_empty()
    }
}
