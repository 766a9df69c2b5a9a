//! MySQL dialect.

use crate::error::Result;
use crate::query::{Grammar, InsertMode};
use crate::schema::{Blueprint, Column, ColumnType, Position, SchemaGrammar};

use super::Dialect;

const TYPE_MAP: &[(ColumnType, &str)] = &[
    (ColumnType::Tiny, "TINYINT"),
    (ColumnType::Int, "INT"),
    (ColumnType::BigInt, "BIGINT"),
    (ColumnType::Float, "FLOAT"),
    (ColumnType::Text, "TEXT"),
    (ColumnType::Char, "CHAR"),
    (ColumnType::Varchar, "VARCHAR"),
    (ColumnType::Date, "DATE"),
    (ColumnType::DateTime, "DATETIME"),
    (ColumnType::Timestamp, "TIMESTAMP"),
    (ColumnType::Time, "TIME"),
    (ColumnType::Enum, "ENUM"),
];

/// MySQL dialect.
///
/// Backtick identifiers, backslash string escaping and `<=>` for
/// null-safe comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn position(&self, column: &Column) -> String {
        match &column.position {
            Some(Position::After(after)) => format!(" AFTER {}", self.quote_identifier(after)),
            Some(Position::First) => String::from(" FIRST"),
            None => String::new(),
        }
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    fn escape_string(&self, value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '\0' => escaped.push_str("\\0"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\\' => escaped.push_str("\\\\"),
                '\'' => escaped.push_str("\\'"),
                '"' => escaped.push_str("\\\""),
                '\x1a' => escaped.push_str("\\Z"),
                other => escaped.push(other),
            }
        }
        escaped
    }

    fn null_operator(&self) -> &'static str {
        "<=>"
    }
}

impl Grammar for MySqlDialect {
    fn insert_prefix(&self, mode: InsertMode) -> &'static str {
        match mode {
            InsertMode::Plain | InsertMode::Upsert => "INSERT INTO",
            InsertMode::Ignore => "INSERT IGNORE INTO",
            InsertMode::Replace => "REPLACE INTO",
        }
    }

    fn upsert_clause(&self, columns: &[&str]) -> String {
        let sets: Vec<String> = columns
            .iter()
            .map(|c| format!("{c} = VALUES({c})"))
            .collect();
        format!("ON DUPLICATE KEY UPDATE {}", sets.join(", "))
    }

    fn no_limit(&self) -> &'static str {
        "18446744073709551615"
    }
}

impl SchemaGrammar for MySqlDialect {
    fn type_map(&self) -> &'static [(ColumnType, &'static str)] {
        TYPE_MAP
    }

    fn type_definition(&self, column: &Column) -> Result<String> {
        let native = self.native_type(column.column_type)?;
        let rendered = match column.column_type {
            ColumnType::Enum => {
                let values: Vec<String> = column
                    .enum_values
                    .iter()
                    .map(|v| format!("'{}'", self.escape_string(v)))
                    .collect();
                format!("{native}({})", values.join(", "))
            }
            ColumnType::Varchar => format!("{native}({})", column.length.unwrap_or(255)),
            ColumnType::Tiny
            | ColumnType::Int
            | ColumnType::BigInt
            | ColumnType::Float
            | ColumnType::Char => match column.length {
                Some(length) => format!("{native}({length})"),
                None => String::from(native),
            },
            _ => String::from(native),
        };
        Ok(rendered)
    }

    fn unsigned_keyword(&self) -> Option<&'static str> {
        Some("UNSIGNED")
    }

    fn autoincrement_definition(&self, _column: &Column) -> Result<Option<String>> {
        Ok(Some(String::from("AUTO_INCREMENT")))
    }

    fn on_update_definition(&self) -> Result<String> {
        Ok(String::from("ON UPDATE CURRENT_TIMESTAMP"))
    }

    fn inline_indexes(&self) -> bool {
        true
    }

    fn compile_alter(&self, blueprint: &Blueprint) -> Result<Vec<String>> {
        let table = blueprint.table();
        let mut actions = Vec::new();

        for column in blueprint.columns() {
            let verb = if column.change { "MODIFY COLUMN" } else { "ADD COLUMN" };
            actions.push(format!(
                "{verb} {}{}",
                self.column_definition(column)?,
                self.position(column)
            ));
            if column.index {
                actions.push(format!(
                    "ADD INDEX {} ({})",
                    self.quote_identifier(&self.index_name(table, &column.name)),
                    self.quote_identifier(&column.name)
                ));
            }
        }

        for name in blueprint.dropped_columns() {
            actions.push(format!("DROP COLUMN {}", self.quote_identifier(name)));
        }

        for (from, to) in blueprint.renamed_columns() {
            actions.push(format!(
                "RENAME COLUMN {} TO {}",
                self.quote_identifier(from),
                self.quote_identifier(to)
            ));
        }

        for foreign_key in blueprint.foreign_keys() {
            actions.push(format!(
                "ADD {}",
                self.foreign_key_definition(blueprint, foreign_key)?
            ));
        }

        for name in blueprint.dropped_foreign_keys() {
            actions.push(format!("DROP FOREIGN KEY {}", self.quote_identifier(name)));
        }

        if actions.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![format!(
            "ALTER TABLE {} {}",
            self.quote_identifier(table),
            actions.join(", ")
        )])
    }

    fn compile_rename(&self, from: &str, to: &str) -> String {
        format!(
            "RENAME TABLE {} TO {}",
            self.quote_identifier(from),
            self.quote_identifier(to)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SqlValue;

    #[test]
    fn test_every_tag_is_mapped() {
        let dialect = MySqlDialect::new();
        for tag in ColumnType::ALL {
            assert!(dialect.native_type(tag).is_ok(), "{} is unmapped", tag.as_str());
        }
    }

    #[test]
    fn test_backslash_escaping() {
        let dialect = MySqlDialect::new();
        assert_eq!(dialect.escape_string("it's"), "it\\'s");
        assert_eq!(dialect.escape_string("a\\b\n"), "a\\\\b\\n");
        assert_eq!(
            dialect.escape(&SqlValue::Text(String::from("say \"hi\""))),
            "'say \\\"hi\\\"'"
        );
    }

    #[test]
    fn test_quote_identifier() {
        let dialect = MySqlDialect::new();
        assert_eq!(dialect.quote_identifier("users.id"), "`users`.`id`");
        assert_eq!(dialect.quote_identifier("odd`name"), "`odd``name`");
    }

    #[test]
    fn test_type_definitions() {
        let dialect = MySqlDialect::new();
        let mut column = Column::new("role", ColumnType::Enum);
        column.enum_values = vec![String::from("admin"), String::from("o'neil")];
        assert_eq!(
            dialect.type_definition(&column).unwrap(),
            "ENUM('admin', 'o\\'neil')"
        );

        let column = Column::new("name", ColumnType::Varchar);
        assert_eq!(dialect.type_definition(&column).unwrap(), "VARCHAR(255)");

        let column = Column::new("born", ColumnType::Date);
        assert_eq!(dialect.type_definition(&column).unwrap(), "DATE");
    }
}
