//! Rendering of builder state into SQL text plus bound parameters.
//!
//! [`Grammar`] carries the whole rendering pipeline as default methods. A
//! dialect only overrides the hooks where its syntax differs: the insert
//! prefix for conflict handling, the upsert clause, and the "no limit"
//! literal used when OFFSET is given without LIMIT.

use tracing::debug;

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::value::SqlValue;

use super::builder::{InsertMode, Join, JoinKind, Operation, StatementState};
use super::condition::{is_word_operator, Condition, ConditionNode, Operand};
use super::row::Row;

/// Parameters bound while rendering one statement, in placeholder order.
#[derive(Debug, Default)]
pub struct Bindings {
    values: Vec<SqlValue>,
}

impl Bindings {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Appends a value and returns its 1-based position.
    pub fn push(&mut self, value: SqlValue) -> usize {
        self.values.push(value.coerce());
        self.values.len()
    }

    /// Number of bound values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the list, returning the values.
    #[must_use]
    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

/// Statement renderer for a dialect.
pub trait Grammar: Dialect {
    /// Renders a statement. The result is trimmed and its parameters are
    /// collected fresh on every call.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MissingTable`] when no table was set.
    fn compile(&self, state: &StatementState) -> Result<(String, Vec<SqlValue>)> {
        let table = state.table.as_deref().ok_or(Error::MissingTable)?;
        let mut bindings = Bindings::new();

        let sql = match &state.operation {
            Operation::Select => self.compile_select(state, table, &mut bindings),
            Operation::Insert { rows, mode } => {
                self.compile_insert(table, rows, *mode, &mut bindings)
            }
            Operation::Update(assignments) => {
                self.compile_update(state, table, assignments, &mut bindings)
            }
            Operation::Delete => self.compile_delete(state, table, &mut bindings),
        };
        let sql = String::from(sql.trim());

        debug!(
            dialect = self.name(),
            sql = %sql,
            params = bindings.len(),
            "compiled statement"
        );
        Ok((sql, bindings.into_values()))
    }

    /// Renders a SELECT.
    fn compile_select(
        &self,
        state: &StatementState,
        table: &str,
        bindings: &mut Bindings,
    ) -> String {
        let mut sql = String::from("SELECT ");

        if state.distinct {
            sql.push_str("DISTINCT ");
        }

        if state.columns.is_empty() {
            sql.push('*');
        } else {
            let columns: Vec<String> = state
                .columns
                .iter()
                .map(|c| match &c.alias {
                    Some(alias) => format!("{} AS {alias}", c.expression),
                    None => c.expression.clone(),
                })
                .collect();
            sql.push_str(&columns.join(", "));
        }

        sql.push_str(" FROM ");
        sql.push_str(table);
        sql.push_str(&self.compile_joins(&state.joins));
        sql.push_str(&self.compile_where(&state.wheres, bindings));

        if !state.groups.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&state.groups.join(", "));
        }

        let having = self.compile_conditions(&state.havings, bindings);
        if !having.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&having);
        }

        sql.push_str(&self.compile_orders(state));
        sql.push_str(&self.compile_limit(state.limit, state.offset));
        sql
    }

    /// Renders an INSERT. Columns come from the first row; every row is
    /// bound in that column order.
    fn compile_insert(
        &self,
        table: &str,
        rows: &[Row],
        mode: InsertMode,
        bindings: &mut Bindings,
    ) -> String {
        let columns: Vec<&str> = rows.first().map(|r| r.columns().collect()).unwrap_or_default();

        let mut sql = String::from(self.insert_prefix(mode));
        sql.push(' ');
        sql.push_str(table);
        sql.push_str(" (");
        sql.push_str(&columns.join(", "));
        sql.push_str(") VALUES ");

        let groups: Vec<String> = rows
            .iter()
            .map(|row| {
                let placeholders: Vec<String> = columns
                    .iter()
                    .map(|column| {
                        let value = row.get(column).cloned().unwrap_or(SqlValue::Null);
                        self.bind(bindings, value)
                    })
                    .collect();
                format!("({})", placeholders.join(", "))
            })
            .collect();
        sql.push_str(&groups.join(", "));

        if mode == InsertMode::Upsert {
            sql.push(' ');
            sql.push_str(&self.upsert_clause(&columns));
        }
        sql
    }

    /// Renders an UPDATE.
    fn compile_update(
        &self,
        state: &StatementState,
        table: &str,
        assignments: &Row,
        bindings: &mut Bindings,
    ) -> String {
        let mut sql = String::from("UPDATE ");
        sql.push_str(table);
        sql.push_str(&self.compile_joins(&state.joins));
        sql.push_str(" SET ");

        let sets: Vec<String> = assignments
            .iter()
            .map(|(column, value)| format!("{column} = {}", self.bind(bindings, value.clone())))
            .collect();
        sql.push_str(&sets.join(", "));

        sql.push_str(&self.compile_where(&state.wheres, bindings));
        sql.push_str(&self.compile_orders(state));
        if let Some(n) = state.limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }
        sql
    }

    /// Renders a DELETE.
    fn compile_delete(
        &self,
        state: &StatementState,
        table: &str,
        bindings: &mut Bindings,
    ) -> String {
        let mut sql = String::from("DELETE FROM ");
        sql.push_str(table);
        sql.push_str(&self.compile_where(&state.wheres, bindings));
        sql.push_str(&self.compile_orders(state));
        if let Some(n) = state.limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }
        sql
    }

    /// Renders the join clauses, each preceded by a space.
    fn compile_joins(&self, joins: &[Join]) -> String {
        let mut sql = String::new();
        for join in joins {
            sql.push(' ');
            sql.push_str(join.kind.as_sql());
            sql.push(' ');
            sql.push_str(&join.table);
            if join.kind != JoinKind::Cross {
                sql.push_str(&format!(" ON {} {} {}", join.left, join.operator, join.right));
            }
        }
        sql
    }

    /// Renders ` WHERE ...`, or nothing for an empty tree.
    fn compile_where(&self, nodes: &[ConditionNode], bindings: &mut Bindings) -> String {
        let conditions = self.compile_conditions(nodes, bindings);
        if conditions.is_empty() {
            conditions
        } else {
            format!(" WHERE {conditions}")
        }
    }

    /// Renders a condition list depth-first. The connector of the first
    /// rendered node is omitted and empty groups are skipped.
    fn compile_conditions(&self, nodes: &[ConditionNode], bindings: &mut Bindings) -> String {
        let mut sql = String::new();
        for node in nodes {
            let rendered = match node {
                ConditionNode::Leaf(condition) => self.compile_condition(condition, bindings),
                ConditionNode::Group { nodes, .. } => {
                    let inner = self.compile_conditions(nodes, bindings);
                    if inner.is_empty() {
                        continue;
                    }
                    format!("({inner})")
                }
            };
            if !sql.is_empty() {
                sql.push(' ');
                sql.push_str(node.connector().as_sql());
                sql.push(' ');
            }
            sql.push_str(&rendered);
        }
        sql
    }

    /// Renders a single condition.
    fn compile_condition(&self, condition: &Condition, bindings: &mut Bindings) -> String {
        let rhs = match &condition.operand {
            Operand::None => return condition.column.clone(),
            Operand::Ignore => String::new(),
            Operand::Raw(sql) => sql.clone(),
            Operand::Value(value) => self.bind(bindings, value.clone()),
            Operand::List(values) if values.is_empty() => String::from("(NULL)"),
            Operand::List(values) => {
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|v| self.bind(bindings, v.clone()))
                    .collect();
                format!("({})", placeholders.join(", "))
            }
        };

        let word = is_word_operator(&condition.operator);
        let mut sql = condition.column.clone();
        if word {
            sql.push(' ');
        }
        sql.push_str(&condition.operator);
        if word && !rhs.is_empty() {
            sql.push(' ');
        }
        sql.push_str(&rhs);
        sql
    }

    /// Renders ` ORDER BY ...`, or nothing.
    fn compile_orders(&self, state: &StatementState) -> String {
        if state.orders.is_empty() {
            return String::new();
        }
        let orders: Vec<String> = state
            .orders
            .iter()
            .map(|o| format!("{} {}", o.column, o.direction.as_sql()))
            .collect();
        format!(" ORDER BY {}", orders.join(", "))
    }

    /// Renders ` LIMIT n [OFFSET m]`. An offset without a limit uses the
    /// dialect's [`no_limit`](Self::no_limit) literal.
    fn compile_limit(&self, limit: Option<i64>, offset: Option<i64>) -> String {
        match (limit, offset) {
            (Some(l), Some(o)) => format!(" LIMIT {l} OFFSET {o}"),
            (Some(l), None) => format!(" LIMIT {l}"),
            (None, Some(o)) => format!(" LIMIT {} OFFSET {o}", self.no_limit()),
            (None, None) => String::new(),
        }
    }

    /// Binds a value and returns its placeholder.
    fn bind(&self, bindings: &mut Bindings, value: SqlValue) -> String {
        let index = bindings.push(value);
        self.placeholder(index)
    }

    /// Statement prefix up to and including `INTO`.
    fn insert_prefix(&self, mode: InsertMode) -> &'static str {
        match mode {
            InsertMode::Plain | InsertMode::Upsert => "INSERT INTO",
            InsertMode::Ignore => "INSERT OR IGNORE INTO",
            InsertMode::Replace => "INSERT OR REPLACE INTO",
        }
    }

    /// Clause appended to an upsert, updating every inserted column.
    fn upsert_clause(&self, columns: &[&str]) -> String {
        let sets: Vec<String> = columns
            .iter()
            .map(|c| format!("{c} = excluded.{c}"))
            .collect();
        format!("ON CONFLICT DO UPDATE SET {}", sets.join(", "))
    }

    /// LIMIT literal meaning "no limit".
    fn no_limit(&self) -> &'static str {
        "-1"
    }
}
