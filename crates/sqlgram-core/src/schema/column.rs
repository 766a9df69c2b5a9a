//! Column descriptors.

use crate::value::{SqlValue, ToSqlValue};

/// Column type tags. Each schema grammar maps every tag to a native type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Tiny integer.
    Tiny,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    BigInt,
    /// Floating point.
    Float,
    /// Unbounded text.
    Text,
    /// Fixed-length string.
    Char,
    /// Variable-length string.
    Varchar,
    /// Date only.
    Date,
    /// Date and time.
    DateTime,
    /// Timestamp.
    Timestamp,
    /// Time only.
    Time,
    /// One value out of a fixed list.
    Enum,
}

impl ColumnType {
    /// Every tag, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Tiny,
        Self::Int,
        Self::BigInt,
        Self::Float,
        Self::Text,
        Self::Char,
        Self::Varchar,
        Self::Date,
        Self::DateTime,
        Self::Timestamp,
        Self::Time,
        Self::Enum,
    ];

    /// Returns the tag name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Int => "int",
            Self::BigInt => "big_int",
            Self::Float => "float",
            Self::Text => "text",
            Self::Char => "char",
            Self::Varchar => "varchar",
            Self::Date => "date",
            Self::DateTime => "date_time",
            Self::Timestamp => "timestamp",
            Self::Time => "time",
            Self::Enum => "enum",
        }
    }

    /// Parses a tag name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Returns true for the integer tags.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Tiny | Self::Int | Self::BigInt)
    }
}

/// Default value of a column.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// A value escaped by the dialect.
    Value(SqlValue),
    /// SQL embedded verbatim.
    Raw(String),
}

/// Placement of an added column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    /// `AFTER <column>`
    After(String),
    /// `FIRST`
    First,
}

/// A column descriptor. Modifiers return `&mut Self` so they chain off the
/// blueprint factories.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Type tag.
    pub column_type: ColumnType,
    /// Length or precision, if any.
    pub length: Option<u32>,
    /// Integer without sign.
    pub unsigned: bool,
    /// Adds a unique index.
    pub unique: bool,
    /// Columns are NOT NULL unless marked nullable.
    pub nullable: bool,
    /// Default value.
    pub default: Option<DefaultValue>,
    /// `DEFAULT CURRENT_TIMESTAMP`, taking precedence over `default`.
    pub use_current: bool,
    /// `ON UPDATE CURRENT_TIMESTAMP`
    pub use_current_on_update: bool,
    /// Auto-incrementing integer.
    pub autoincrement: bool,
    /// Part of the primary key.
    pub primary: bool,
    /// Adds a single-column index.
    pub index: bool,
    /// Allowed values of an enum column.
    pub enum_values: Vec<String>,
    /// Placement when added by ALTER.
    pub position: Option<Position>,
    /// Modify an existing column instead of adding one (ALTER only).
    pub change: bool,
}

impl Column {
    /// Creates a NOT NULL column without modifiers.
    #[must_use]
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: String::from(name),
            column_type,
            length: None,
            unsigned: false,
            unique: false,
            nullable: false,
            default: None,
            use_current: false,
            use_current_on_update: false,
            autoincrement: false,
            primary: false,
            index: false,
            enum_values: Vec::new(),
            position: None,
            change: false,
        }
    }

    /// Sets the length.
    pub fn length(&mut self, length: u32) -> &mut Self {
        self.length = Some(length);
        self
    }

    /// Marks an integer as unsigned.
    pub fn unsigned(&mut self) -> &mut Self {
        self.unsigned = true;
        self
    }

    /// Adds a unique index.
    pub fn unique(&mut self) -> &mut Self {
        self.unique = true;
        self
    }

    /// Allows NULL.
    pub fn nullable(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    /// Sets a default value, escaped by the dialect when rendered.
    pub fn default<T: ToSqlValue>(&mut self, value: T) -> &mut Self {
        self.default = Some(DefaultValue::Value(value.to_sql_value().coerce()));
        self
    }

    /// Sets a default embedded verbatim.
    pub fn default_raw(&mut self, sql: &str) -> &mut Self {
        self.default = Some(DefaultValue::Raw(String::from(sql)));
        self
    }

    /// Defaults to `CURRENT_TIMESTAMP`.
    pub fn use_current(&mut self) -> &mut Self {
        self.use_current = true;
        self
    }

    /// Sets to `CURRENT_TIMESTAMP` on every update.
    pub fn use_current_on_update(&mut self) -> &mut Self {
        self.use_current_on_update = true;
        self
    }

    /// Marks the column auto-incrementing.
    pub fn autoincrement(&mut self) -> &mut Self {
        self.autoincrement = true;
        self
    }

    /// Adds the column to the primary key.
    pub fn primary(&mut self) -> &mut Self {
        self.primary = true;
        self
    }

    /// Adds a single-column index.
    pub fn index(&mut self) -> &mut Self {
        self.index = true;
        self
    }

    /// Places an added column after `column`.
    pub fn after(&mut self, column: &str) -> &mut Self {
        self.position = Some(Position::After(String::from(column)));
        self
    }

    /// Places an added column first.
    pub fn first(&mut self) -> &mut Self {
        self.position = Some(Position::First);
        self
    }

    /// Modifies the existing column instead of adding one.
    pub fn change(&mut self) -> &mut Self {
        self.change = true;
        self
    }
}
