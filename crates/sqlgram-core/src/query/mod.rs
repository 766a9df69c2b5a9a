//! Statement building and rendering.

mod aggregate;
mod builder;
pub mod condition;
mod driver;
mod grammar;
mod row;

pub use aggregate::Aggregate;
pub use builder::{
    Direction, InsertMode, Join, JoinKind, Operation, OrderBy, QueryBuilder, SelectColumn,
    StatementState,
};
pub use condition::{Condition, ConditionArgs, ConditionNode, Connector, IntoOperand, Operand};
pub use driver::{driver_error, Driver};
pub use grammar::{Bindings, Grammar};
pub use row::{IntoRows, Row};
