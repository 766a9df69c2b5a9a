//! # sqlgram-core
//!
//! A dialect-aware SQL query and schema builder.
//!
//! This crate provides:
//! - A fluent statement builder producing SQL text plus positional parameters
//! - Dialect grammars for MySQL and SQLite, with hooks for custom dialects
//! - Schema blueprints compiled into CREATE / ALTER statements
//! - A narrow [`Driver`](query::Driver) trait for executing what was built
//!
//! Nothing in this crate performs I/O. Literal escaping is a pure dialect
//! function; everything else is bound as a parameter.
//!
//! ## Building Statements
//!
//! ```rust
//! use sqlgram_core::query::QueryBuilder;
//! use sqlgram_core::SqlValue;
//!
//! let (sql, params) = QueryBuilder::mysql()
//!     .table("users")
//!     .group_by(&["registered", "created"])
//!     .having(("id", ">=", 5))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(sql, "SELECT * FROM users GROUP BY registered, created HAVING id>=?");
//! assert_eq!(params, vec![SqlValue::Int(5)]);
//! ```
//!
//! ## SQL Injection Prevention
//!
//! ```rust
//! use sqlgram_core::query::QueryBuilder;
//! use sqlgram_core::SqlValue;
//!
//! let user_input = "'; DROP TABLE users; --";
//! let (sql, params) = QueryBuilder::sqlite()
//!     .table("users")
//!     .where_(("name", user_input))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(sql, "SELECT * FROM users WHERE name=?");
//! assert_eq!(params, vec![SqlValue::Text(user_input.to_string())]);
//! ```

pub mod dialect;
mod error;
pub mod query;
pub mod schema;
mod value;

pub use dialect::{Dialect, MySqlDialect, SqliteDialect};
pub use error::{Error, Result};
pub use query::{Driver, Grammar, QueryBuilder, Row};
pub use schema::{Blueprint, Schema, SchemaGrammar};
pub use value::{SqlValue, ToSqlValue};
