//! WHERE / HAVING condition trees.
//!
//! Conditions are accepted in one of three argument shapes and normalized
//! into a [`ConditionNode`] tree:
//!
//! - a raw boolean expression (`"score > bonus"`),
//! - a `(column, value)` pair, compared with `=` (or the dialect's null-safe
//!   operator when the value is NULL),
//! - a `(column, operator, value)` triple, with the operator taken verbatim.
//!
//! A list of argument shapes becomes a parenthesized OR-group.

use crate::value::{SqlValue, ToSqlValue};

/// Logical connector placed before a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    /// `AND`
    And,
    /// `OR`
    Or,
}

impl Connector {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No right-hand side: the column holds a raw expression.
    None,
    /// A single value bound to one placeholder.
    Value(SqlValue),
    /// A parenthesized list of values, one placeholder each.
    List(Vec<SqlValue>),
    /// Raw SQL embedded verbatim, such as another column.
    Raw(String),
    /// Render column and operator only; the operator already carries the
    /// right-hand side (`BETWEEN 1 AND 5`).
    Ignore,
}

impl Operand {
    /// Creates a raw operand.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }

    /// Creates a list operand.
    pub fn list<T: ToSqlValue>(values: impl IntoIterator<Item = T>) -> Self {
        Self::List(
            values
                .into_iter()
                .map(|v| v.to_sql_value().coerce())
                .collect(),
        )
    }

    /// Number of placeholders this operand consumes when rendered.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        match self {
            Self::Value(_) => 1,
            Self::List(values) => values.len(),
            Self::None | Self::Raw(_) | Self::Ignore => 0,
        }
    }

    const fn is_null(&self) -> bool {
        matches!(self, Self::Value(SqlValue::Null))
    }
}

/// Conversion into a condition operand.
pub trait IntoOperand {
    /// Converts into an [`Operand`].
    fn into_operand(self) -> Operand;
}

impl<T: ToSqlValue> IntoOperand for T {
    fn into_operand(self) -> Operand {
        Operand::Value(self.to_sql_value().coerce())
    }
}

impl IntoOperand for Operand {
    fn into_operand(self) -> Operand {
        match self {
            Self::Value(v) => Self::Value(v.coerce()),
            other => other,
        }
    }
}

/// A normalized leaf condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Column name, or the whole expression for raw conditions.
    pub column: String,
    /// Comparison operator; empty for raw conditions.
    pub operator: String,
    /// Right-hand side.
    pub operand: Operand,
    /// Connector placed before this condition.
    pub connector: Connector,
}

/// A node of a condition tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNode {
    /// A single condition.
    Leaf(Condition),
    /// A parenthesized group.
    Group {
        /// Connector placed before the group.
        connector: Connector,
        /// Members of the group.
        nodes: Vec<ConditionNode>,
    },
}

impl ConditionNode {
    /// Returns the connector placed before this node.
    #[must_use]
    pub const fn connector(&self) -> Connector {
        match self {
            Self::Leaf(condition) => condition.connector,
            Self::Group { connector, .. } => *connector,
        }
    }

    fn set_connector(&mut self, value: Connector) {
        match self {
            Self::Leaf(condition) => condition.connector = value,
            Self::Group { connector, .. } => *connector = value,
        }
    }

    /// Number of placeholders the node consumes when rendered.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        match self {
            Self::Leaf(condition) => condition.operand.placeholder_count(),
            Self::Group { nodes, .. } => nodes.iter().map(Self::placeholder_count).sum(),
        }
    }
}

/// The accepted argument shapes of `where_` / `having`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionArgs {
    /// One argument: a raw boolean expression.
    Raw(String),
    /// Two arguments: column and value.
    Pair(String, Operand),
    /// Three arguments: column, operator and value.
    Triple(String, String, Operand),
    /// A list of arguments forming an OR-group.
    Group(Vec<ConditionArgs>),
}

impl From<&str> for ConditionArgs {
    fn from(expr: &str) -> Self {
        Self::Raw(String::from(expr))
    }
}

impl From<String> for ConditionArgs {
    fn from(expr: String) -> Self {
        Self::Raw(expr)
    }
}

impl<C: Into<String>, V: IntoOperand> From<(C, V)> for ConditionArgs {
    fn from((column, value): (C, V)) -> Self {
        Self::Pair(column.into(), value.into_operand())
    }
}

impl<C: Into<String>, O: Into<String>, V: IntoOperand> From<(C, O, V)> for ConditionArgs {
    fn from((column, operator, value): (C, O, V)) -> Self {
        Self::Triple(column.into(), operator.into(), value.into_operand())
    }
}

impl<T: Into<ConditionArgs>> From<Vec<T>> for ConditionArgs {
    fn from(list: Vec<T>) -> Self {
        Self::Group(list.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ConditionArgs>, const N: usize> From<[T; N]> for ConditionArgs {
    fn from(list: [T; N]) -> Self {
        Self::Group(list.into_iter().map(Into::into).collect())
    }
}

/// Normalizes condition arguments into a tree node.
///
/// `null_operator` replaces `=` for two-argument conditions whose value is
/// NULL. Inside a group every member after the first is connected with `OR`,
/// whatever the caller asked for.
#[must_use]
pub fn normalize(
    args: ConditionArgs,
    connector: Connector,
    null_operator: &str,
) -> ConditionNode {
    match args {
        ConditionArgs::Raw(expr) => ConditionNode::Leaf(Condition {
            column: expr,
            operator: String::new(),
            operand: Operand::None,
            connector,
        }),
        ConditionArgs::Pair(column, operand) => {
            let operator = if operand.is_null() {
                String::from(null_operator)
            } else {
                String::from("=")
            };
            ConditionNode::Leaf(Condition {
                column,
                operator,
                operand,
                connector,
            })
        }
        ConditionArgs::Triple(column, operator, operand) => ConditionNode::Leaf(Condition {
            column,
            operator,
            operand,
            connector,
        }),
        ConditionArgs::Group(members) => {
            let nodes = members
                .into_iter()
                .enumerate()
                .map(|(i, member)| {
                    let mut node = normalize(member, Connector::Or, null_operator);
                    if i == 0 {
                        node.set_connector(Connector::And);
                    }
                    node
                })
                .collect();
            ConditionNode::Group { connector, nodes }
        }
    }
}

/// Returns true when an operator is a keyword (`IS`, `LIKE`, `IN`, ...)
/// and must be separated from its operands by spaces.
#[must_use]
pub fn is_word_operator(operator: &str) -> bool {
    operator
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(node: &ConditionNode) -> &Condition {
        match node {
            ConditionNode::Leaf(condition) => condition,
            ConditionNode::Group { .. } => panic!("expected a leaf, got {node:?}"),
        }
    }

    #[test]
    fn test_one_argument_is_raw() {
        let node = normalize("votes > 100".into(), Connector::And, "IS");
        let condition = leaf(&node);
        assert_eq!(condition.column, "votes > 100");
        assert_eq!(condition.operator, "");
        assert_eq!(condition.operand, Operand::None);
    }

    #[test]
    fn test_two_arguments_default_to_equals() {
        let node = normalize(("name", "John").into(), Connector::And, "IS");
        let condition = leaf(&node);
        assert_eq!(condition.operator, "=");
        assert_eq!(
            condition.operand,
            Operand::Value(SqlValue::Text("John".into()))
        );
    }

    #[test]
    fn test_two_arguments_with_null_use_dialect_operator() {
        let node = normalize(("deleted", SqlValue::Null).into(), Connector::And, "<=>");
        assert_eq!(leaf(&node).operator, "<=>");

        let node = normalize(("deleted", None::<i64>).into(), Connector::And, "IS");
        assert_eq!(leaf(&node).operator, "IS");
    }

    #[test]
    fn test_three_arguments_keep_operator() {
        let node = normalize(("id", ">=", 5).into(), Connector::Or, "IS");
        let condition = leaf(&node);
        assert_eq!(condition.operator, ">=");
        assert_eq!(condition.connector, Connector::Or);
        assert_eq!(condition.operand, Operand::Value(SqlValue::Int(5)));
    }

    #[test]
    fn test_booleans_are_coerced() {
        let node = normalize(("active", true).into(), Connector::And, "IS");
        assert_eq!(leaf(&node).operand, Operand::Value(SqlValue::Int(1)));

        let node = normalize(
            ("active", Operand::Value(SqlValue::Bool(false))).into(),
            Connector::And,
            "IS",
        );
        assert_eq!(leaf(&node).operand, Operand::Value(SqlValue::Int(0)));
    }

    #[test]
    fn test_group_forces_or_after_first() {
        let args: ConditionArgs = vec![
            ConditionArgs::from(("a", 1)),
            ConditionArgs::from(("b", ">", 2)),
            ConditionArgs::from("c IS NOT NULL"),
        ]
        .into();
        let node = normalize(args, Connector::And, "IS");
        match node {
            ConditionNode::Group { connector, nodes } => {
                assert_eq!(connector, Connector::And);
                assert_eq!(nodes.len(), 3);
                assert_eq!(nodes[0].connector(), Connector::And);
                assert_eq!(nodes[1].connector(), Connector::Or);
                assert_eq!(nodes[2].connector(), Connector::Or);
            }
            ConditionNode::Leaf(_) => panic!("expected a group"),
        }
    }

    #[test]
    fn test_placeholder_count() {
        let args: ConditionArgs = [("a", Operand::list([1, 2, 3])), ("b", Operand::Ignore)].into();
        let node = normalize(args, Connector::And, "IS");
        assert_eq!(node.placeholder_count(), 3);
        assert_eq!(Operand::raw("x.id").placeholder_count(), 0);
    }

    #[test]
    fn test_word_operator_detection() {
        assert!(is_word_operator("IS"));
        assert!(is_word_operator("NOT LIKE"));
        assert!(is_word_operator("BETWEEN 1 AND 2"));
        assert!(!is_word_operator("="));
        assert!(!is_word_operator("<=>"));
        assert!(!is_word_operator(""));
    }
}
