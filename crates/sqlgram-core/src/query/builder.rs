//! Fluent statement builder.
//!
//! A [`QueryBuilder`] accumulates a [`StatementState`] through by-value
//! setters and hands it to its [`Grammar`] on [`QueryBuilder::build`].
//!
//! # Example
//!
//! ```rust
//! use sqlgram_core::query::QueryBuilder;
//!
//! let (sql, params) = QueryBuilder::mysql()
//!     .table("users")
//!     .where_(("name", "John"))
//!     .select("email")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(sql, "SELECT email FROM users WHERE name=?");
//! assert_eq!(params.len(), 1);
//! ```

use crate::dialect::{MySqlDialect, SqliteDialect};
use crate::error::{Error, Result};
use crate::value::{SqlValue, ToSqlValue};

use super::condition::{normalize, ConditionArgs, ConditionNode, Connector, Operand};
use super::grammar::Grammar;
use super::row::{IntoRows, Row};

/// Join flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `JOIN`
    Join,
    /// `LEFT JOIN`
    Left,
    /// `LEFT OUTER JOIN`
    LeftOuter,
    /// `RIGHT JOIN`
    Right,
    /// `RIGHT OUTER JOIN`
    RightOuter,
    /// `INNER JOIN`
    Inner,
    /// `CROSS JOIN`
    Cross,
}

impl JoinKind {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Join => "JOIN",
            Self::Left => "LEFT JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
            Self::Right => "RIGHT JOIN",
            Self::RightOuter => "RIGHT OUTER JOIN",
            Self::Inner => "INNER JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// A join clause. Cross joins leave the ON fields empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// Join flavor.
    pub kind: JoinKind,
    /// Joined table.
    pub table: String,
    /// Left-hand column of the ON clause.
    pub left: String,
    /// ON operator.
    pub operator: String,
    /// Right-hand column of the ON clause.
    pub right: String,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Ascending order (ASC)
    #[default]
    Asc,
    /// Descending order (DESC)
    Desc,
}

impl Direction {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// An ordering specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column to order by.
    pub column: String,
    /// Order direction.
    pub direction: Direction,
}

/// A selected expression with an optional alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectColumn {
    /// Column or expression.
    pub expression: String,
    /// Alias rendered with `AS`.
    pub alias: Option<String>,
}

/// Conflict behavior of an INSERT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertMode {
    /// Plain insert.
    #[default]
    Plain,
    /// Skip rows that violate a unique constraint.
    Ignore,
    /// Update the conflicting row in place.
    Upsert,
    /// Delete the conflicting row and insert the new one.
    Replace,
}

/// The statement kind. The last operation set wins.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Operation {
    /// SELECT
    #[default]
    Select,
    /// INSERT of one or more rows sharing the same columns.
    Insert {
        /// Rows to insert.
        rows: Vec<Row>,
        /// Conflict behavior.
        mode: InsertMode,
    },
    /// UPDATE with the given assignments.
    Update(Row),
    /// DELETE
    Delete,
}

/// Everything a builder has accumulated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatementState {
    /// Target table.
    pub table: Option<String>,
    /// Statement kind and payload.
    pub operation: Operation,
    /// Selected columns; empty means `*`.
    pub columns: Vec<SelectColumn>,
    /// SELECT DISTINCT.
    pub distinct: bool,
    /// Joins in call order.
    pub joins: Vec<Join>,
    /// WHERE tree.
    pub wheres: Vec<ConditionNode>,
    /// GROUP BY columns.
    pub groups: Vec<String>,
    /// HAVING tree.
    pub havings: Vec<ConditionNode>,
    /// ORDER BY entries.
    pub orders: Vec<OrderBy>,
    /// LIMIT, rendered verbatim.
    pub limit: Option<i64>,
    /// OFFSET, rendered verbatim.
    pub offset: Option<i64>,
}

/// A fluent, dialect-aware statement builder.
#[derive(Debug, Clone)]
pub struct QueryBuilder<G: Grammar> {
    grammar: G,
    state: StatementState,
}

impl QueryBuilder<MySqlDialect> {
    /// Creates a builder rendering MySQL.
    #[must_use]
    pub fn mysql() -> Self {
        Self::new(MySqlDialect::new())
    }
}

impl QueryBuilder<SqliteDialect> {
    /// Creates a builder rendering SQLite.
    #[must_use]
    pub fn sqlite() -> Self {
        Self::new(SqliteDialect::new())
    }
}

impl<G: Grammar> QueryBuilder<G> {
    /// Creates a builder for the given grammar.
    #[must_use]
    pub fn new(grammar: G) -> Self {
        Self {
            grammar,
            state: StatementState::default(),
        }
    }

    /// Returns the accumulated state.
    #[must_use]
    pub const fn state(&self) -> &StatementState {
        &self.state
    }

    /// Returns the grammar.
    #[must_use]
    pub const fn grammar(&self) -> &G {
        &self.grammar
    }

    /// Sets the target table.
    #[must_use]
    pub fn table(mut self, name: &str) -> Self {
        self.state.table = Some(String::from(name));
        self
    }

    /// Selects distinct rows.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.state.distinct = true;
        self
    }

    /// Adds a selected column or expression.
    #[must_use]
    pub fn select(mut self, column: &str) -> Self {
        self.state.columns.push(SelectColumn {
            expression: String::from(column),
            alias: None,
        });
        self
    }

    /// Adds a selected column or expression with an alias.
    #[must_use]
    pub fn select_as(mut self, column: &str, alias: &str) -> Self {
        self.state.columns.push(SelectColumn {
            expression: String::from(column),
            alias: Some(String::from(alias)),
        });
        self
    }

    /// Drops every selected column, falling back to `*`.
    #[must_use]
    pub fn clear_select(mut self) -> Self {
        self.state.columns.clear();
        self
    }

    fn push_join(
        mut self,
        kind: JoinKind,
        table: &str,
        left: &str,
        operator: &str,
        right: &str,
    ) -> Self {
        self.state.joins.push(Join {
            kind,
            table: String::from(table),
            left: String::from(left),
            operator: String::from(operator),
            right: String::from(right),
        });
        self
    }

    /// Adds a `JOIN`.
    #[must_use]
    pub fn join(self, table: &str, left: &str, operator: &str, right: &str) -> Self {
        self.push_join(JoinKind::Join, table, left, operator, right)
    }

    /// Adds a `LEFT JOIN`.
    #[must_use]
    pub fn left_join(self, table: &str, left: &str, operator: &str, right: &str) -> Self {
        self.push_join(JoinKind::Left, table, left, operator, right)
    }

    /// Adds a `LEFT OUTER JOIN`.
    #[must_use]
    pub fn left_outer_join(self, table: &str, left: &str, operator: &str, right: &str) -> Self {
        self.push_join(JoinKind::LeftOuter, table, left, operator, right)
    }

    /// Adds a `RIGHT JOIN`.
    #[must_use]
    pub fn right_join(self, table: &str, left: &str, operator: &str, right: &str) -> Self {
        self.push_join(JoinKind::Right, table, left, operator, right)
    }

    /// Adds a `RIGHT OUTER JOIN`.
    #[must_use]
    pub fn right_outer_join(self, table: &str, left: &str, operator: &str, right: &str) -> Self {
        self.push_join(JoinKind::RightOuter, table, left, operator, right)
    }

    /// Adds an `INNER JOIN`.
    #[must_use]
    pub fn inner_join(self, table: &str, left: &str, operator: &str, right: &str) -> Self {
        self.push_join(JoinKind::Inner, table, left, operator, right)
    }

    /// Adds a `CROSS JOIN`.
    #[must_use]
    pub fn cross_join(self, table: &str) -> Self {
        self.push_join(JoinKind::Cross, table, "", "", "")
    }

    fn push_where(mut self, args: ConditionArgs, connector: Connector) -> Self {
        let node = normalize(args, connector, self.grammar.null_operator());
        self.state.wheres.push(node);
        self
    }

    fn push_having(mut self, args: ConditionArgs, connector: Connector) -> Self {
        let node = normalize(args, connector, self.grammar.null_operator());
        self.state.havings.push(node);
        self
    }

    /// Adds an `AND` condition.
    ///
    /// Accepts a raw expression (`"a = b"`), a `(column, value)` pair, a
    /// `(column, operator, value)` triple, or a list of those forming an
    /// OR-group.
    #[must_use]
    pub fn where_(self, args: impl Into<ConditionArgs>) -> Self {
        self.push_where(args.into(), Connector::And)
    }

    /// Adds an `OR` condition.
    #[must_use]
    pub fn or_where(self, args: impl Into<ConditionArgs>) -> Self {
        self.push_where(args.into(), Connector::Or)
    }

    /// Adds a raw `AND` expression.
    #[must_use]
    pub fn where_raw(self, expression: &str) -> Self {
        self.push_where(ConditionArgs::from(expression), Connector::And)
    }

    /// Adds `column IS NULL`.
    #[must_use]
    pub fn where_null(self, column: &str) -> Self {
        self.push_where(
            ConditionArgs::Triple(String::from(column), String::from("IS NULL"), Operand::Ignore),
            Connector::And,
        )
    }

    /// Adds `column IS NOT NULL`.
    #[must_use]
    pub fn where_not_null(self, column: &str) -> Self {
        self.push_where(
            ConditionArgs::Triple(
                String::from(column),
                String::from("IS NOT NULL"),
                Operand::Ignore,
            ),
            Connector::And,
        )
    }

    /// Adds `column IN (?, ...)`.
    #[must_use]
    pub fn where_in<T: ToSqlValue>(
        self,
        column: &str,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        self.push_where(
            ConditionArgs::Triple(String::from(column), String::from("IN"), Operand::list(values)),
            Connector::And,
        )
    }

    /// Adds `column NOT IN (?, ...)`.
    #[must_use]
    pub fn where_not_in<T: ToSqlValue>(
        self,
        column: &str,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        self.push_where(
            ConditionArgs::Triple(
                String::from(column),
                String::from("NOT IN"),
                Operand::list(values),
            ),
            Connector::And,
        )
    }

    /// Adds `column BETWEEN low AND high`.
    ///
    /// The bounds are escaped and embedded in the operator; they do not
    /// consume placeholders.
    #[must_use]
    pub fn where_between<L: ToSqlValue, H: ToSqlValue>(
        self,
        column: &str,
        low: L,
        high: H,
    ) -> Self {
        let operator = format!(
            "BETWEEN {} AND {}",
            self.grammar.escape(&low.to_sql_value().coerce()),
            self.grammar.escape(&high.to_sql_value().coerce())
        );
        self.push_where(
            ConditionArgs::Triple(String::from(column), operator, Operand::Ignore),
            Connector::And,
        )
    }

    /// Adds an `AND` condition to HAVING.
    #[must_use]
    pub fn having(self, args: impl Into<ConditionArgs>) -> Self {
        self.push_having(args.into(), Connector::And)
    }

    /// Adds an `OR` condition to HAVING.
    #[must_use]
    pub fn or_having(self, args: impl Into<ConditionArgs>) -> Self {
        self.push_having(args.into(), Connector::Or)
    }

    /// Appends GROUP BY columns.
    #[must_use]
    pub fn group_by(mut self, columns: &[&str]) -> Self {
        self.state
            .groups
            .extend(columns.iter().map(|c| String::from(*c)));
        self
    }

    /// Appends an ORDER BY entry.
    #[must_use]
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.state.orders.push(OrderBy {
            column: String::from(column),
            direction,
        });
        self
    }

    /// Appends a descending ORDER BY entry.
    #[must_use]
    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by(column, Direction::Desc)
    }

    /// Sets LIMIT, replacing any previous value.
    #[must_use]
    pub const fn limit(mut self, n: i64) -> Self {
        self.state.limit = Some(n);
        self
    }

    /// Sets OFFSET, replacing any previous value.
    #[must_use]
    pub const fn offset(mut self, n: i64) -> Self {
        self.state.offset = Some(n);
        self
    }

    fn set_insert(mut self, rows: Vec<Row>, mode: InsertMode) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Ok(self);
        };
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, row)| !row.same_columns(first))
        {
            return Err(Error::MismatchedRowColumns {
                row: index,
                expected: first.column_list(),
                found: row.column_list(),
            });
        }
        self.state.operation = Operation::Insert { rows, mode };
        Ok(self)
    }

    /// Turns the statement into an INSERT of one row or several rows.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MismatchedRowColumns`] when the rows do not share
    /// the same columns. An empty list leaves the builder untouched.
    pub fn insert(self, rows: impl IntoRows) -> Result<Self> {
        self.set_insert(rows.into_rows(), InsertMode::Plain)
    }

    /// Like [`insert`](Self::insert), updating conflicting rows in place.
    ///
    /// # Errors
    ///
    /// Same as [`insert`](Self::insert).
    pub fn insert_or_update(self, rows: impl IntoRows) -> Result<Self> {
        self.set_insert(rows.into_rows(), InsertMode::Upsert)
    }

    /// Like [`insert`](Self::insert), skipping conflicting rows.
    ///
    /// # Errors
    ///
    /// Same as [`insert`](Self::insert).
    pub fn insert_or_ignore(self, rows: impl IntoRows) -> Result<Self> {
        self.set_insert(rows.into_rows(), InsertMode::Ignore)
    }

    /// Like [`insert`](Self::insert), deleting conflicting rows first.
    ///
    /// # Errors
    ///
    /// Same as [`insert`](Self::insert).
    pub fn insert_or_replace(self, rows: impl IntoRows) -> Result<Self> {
        self.set_insert(rows.into_rows(), InsertMode::Replace)
    }

    /// Turns the statement into an UPDATE.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::EmptyUpdate`] when no assignment is given.
    pub fn update(mut self, assignments: Row) -> Result<Self> {
        if assignments.is_empty() {
            return Err(Error::EmptyUpdate);
        }
        self.state.operation = Operation::Update(assignments);
        Ok(self)
    }

    /// Turns the statement into a DELETE.
    #[must_use]
    pub fn delete(mut self) -> Self {
        self.state.operation = Operation::Delete;
        self
    }

    /// Renders the statement and its bound parameters.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MissingTable`] when no table was set.
    pub fn build(&self) -> Result<(String, Vec<SqlValue>)> {
        self.grammar.compile(&self.state)
    }

    pub(crate) fn state_mut(&mut self) -> &mut StatementState {
        &mut self.state
    }
}
