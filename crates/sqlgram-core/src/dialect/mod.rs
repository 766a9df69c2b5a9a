//! SQL dialect support.
//!
//! Different databases have slightly different SQL syntax. The [`Dialect`]
//! trait carries the lexical differences (quoting, escaping, placeholders);
//! the query [`Grammar`](crate::query::Grammar) and the
//! [`SchemaGrammar`](crate::schema::SchemaGrammar) build on it for statement
//! and DDL rendering.

mod mysql;
mod sqlite;

pub use mysql::MySqlDialect;
pub use sqlite::SqliteDialect;

use crate::value::SqlValue;

/// Trait for SQL dialect-specific lexical behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character.
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Quotes an identifier, quoting each part of a dotted name separately.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        name.split('.')
            .map(|part| {
                if part == "*" {
                    String::from(part)
                } else {
                    let doubled = part.replace(quote, &format!("{quote}{quote}"));
                    format!("{quote}{doubled}{quote}")
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Escapes the body of a string literal (without the surrounding quotes).
    fn escape_string(&self, value: &str) -> String {
        value.replace('\'', "''")
    }

    /// Renders a value as an escaped SQL literal.
    ///
    /// Only used where a literal must be embedded in the statement text,
    /// such as column defaults. Everything else is bound as a parameter.
    fn escape(&self, value: &SqlValue) -> String {
        match value {
            SqlValue::Null => String::from("NULL"),
            SqlValue::Bool(b) => i64::from(*b).to_string(),
            SqlValue::Int(n) => n.to_string(),
            // SQL has no literal for NaN or infinity.
            SqlValue::Float(f) if !f.is_finite() => String::from("NULL"),
            SqlValue::Float(f) => f.to_string(),
            SqlValue::Text(s) => format!("'{}'", self.escape_string(s)),
            SqlValue::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }

    /// Returns the placeholder for the `index`-th bound parameter (1-based).
    fn placeholder(&self, _index: usize) -> String {
        String::from("?")
    }

    /// Returns the operator used when a two-argument condition compares to NULL.
    fn null_operator(&self) -> &'static str {
        "IS"
    }
}
