#![allow(dead_code)]

use sqlgram_core::query::QueryBuilder;
use sqlgram_core::{Dialect, Grammar, MySqlDialect, SqlValue, SqliteDialect};

/// A dialect numbering its placeholders `$1`, `$2`, ...
#[derive(Debug, Clone, Copy)]
pub struct Numbered;

impl Dialect for Numbered {
    fn name(&self) -> &'static str {
        "numbered"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }
}

impl Grammar for Numbered {}

pub fn mysql(table: &str) -> QueryBuilder<MySqlDialect> {
    QueryBuilder::mysql().table(table)
}

pub fn sqlite(table: &str) -> QueryBuilder<SqliteDialect> {
    QueryBuilder::sqlite().table(table)
}

pub fn numbered(table: &str) -> QueryBuilder<Numbered> {
    QueryBuilder::new(Numbered).table(table)
}

pub fn build<G: Grammar>(builder: &QueryBuilder<G>) -> (String, Vec<SqlValue>) {
    builder
        .build()
        .unwrap_or_else(|e| panic!("Failed to build: {e}"))
}

pub fn text(s: &str) -> SqlValue {
    SqlValue::Text(String::from(s))
}

pub fn int(n: i64) -> SqlValue {
    SqlValue::Int(n)
}

pub fn count_placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}
