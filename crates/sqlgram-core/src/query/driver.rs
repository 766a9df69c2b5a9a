//! Execution surface.
//!
//! The core never talks to a database. A [`Driver`] receives the compiled
//! `(sql, params)` pair and reports rows or an affected-row count; the
//! conveniences on [`QueryBuilder`] shape the statement, build it, and hand
//! it over.

use tracing::debug;

use crate::error::{Error, Result};
use crate::value::{SqlValue, ToSqlValue};

use super::aggregate::Aggregate;
use super::builder::{Operation, QueryBuilder};
use super::grammar::Grammar;
use super::row::Row;

/// A database connection able to run compiled statements.
///
/// Implementations wrap their native errors with [`Error::driver`].
pub trait Driver {
    /// Runs a statement returning rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Driver`] when execution fails.
    fn fetch_all(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>>;

    /// Runs a statement and returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Driver`] when execution fails.
    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64>;
}

impl<D: Driver + ?Sized> Driver for &D {
    fn fetch_all(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        (**self).fetch_all(sql, params)
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        (**self).execute(sql, params)
    }
}

impl<G: Grammar + Clone> QueryBuilder<G> {
    /// Fetches every matching row.
    ///
    /// # Errors
    ///
    /// Propagates build and driver errors.
    pub fn get(&self, driver: &impl Driver) -> Result<Vec<Row>> {
        let (sql, params) = self.reading().build()?;
        driver.fetch_all(&sql, &params)
    }

    /// Fetches the first matching row.
    ///
    /// # Errors
    ///
    /// Propagates build and driver errors.
    pub fn first(&self, driver: &impl Driver) -> Result<Option<Row>> {
        let rows = self.reading().limit(1).get(driver)?;
        Ok(rows.into_iter().next())
    }

    /// Fetches the row whose `id` column equals `id`.
    ///
    /// # Errors
    ///
    /// Propagates build and driver errors.
    pub fn find<T: ToSqlValue>(&self, driver: &impl Driver, id: T) -> Result<Option<Row>> {
        self.reading().where_(("id", id)).first(driver)
    }

    /// Fetches a single column of the first matching row.
    ///
    /// # Errors
    ///
    /// Propagates build and driver errors.
    pub fn value(&self, driver: &impl Driver, column: &str) -> Result<Option<SqlValue>> {
        let row = self.reading().clear_select().select(column).first(driver)?;
        Ok(row.and_then(|r| r.first_value().cloned()))
    }

    /// Returns true when at least one row matches.
    ///
    /// # Errors
    ///
    /// Propagates build and driver errors.
    pub fn exists(&self, driver: &impl Driver) -> Result<bool> {
        let row = self.reading().clear_select().select("1").first(driver)?;
        Ok(row.is_some())
    }

    /// Counts the matching rows.
    ///
    /// # Errors
    ///
    /// Propagates build and driver errors.
    pub fn count(&self, driver: &impl Driver) -> Result<i64> {
        let value = self.aggregate(driver, &Aggregate::count_all())?;
        Ok(value.as_int().unwrap_or(0))
    }

    /// Maximum of a column, NULL when nothing matches.
    ///
    /// # Errors
    ///
    /// Propagates build and driver errors.
    pub fn max(&self, driver: &impl Driver, column: &str) -> Result<SqlValue> {
        self.aggregate(driver, &Aggregate::Max(String::from(column)))
    }

    /// Minimum of a column, NULL when nothing matches.
    ///
    /// # Errors
    ///
    /// Propagates build and driver errors.
    pub fn min(&self, driver: &impl Driver, column: &str) -> Result<SqlValue> {
        self.aggregate(driver, &Aggregate::Min(String::from(column)))
    }

    /// Average of a column.
    ///
    /// # Errors
    ///
    /// Propagates build and driver errors.
    pub fn avg(&self, driver: &impl Driver, column: &str) -> Result<Option<f64>> {
        let value = self.aggregate(driver, &Aggregate::Avg(String::from(column)))?;
        Ok(value.as_float())
    }

    /// Sum of a column, NULL when nothing matches.
    ///
    /// # Errors
    ///
    /// Propagates build and driver errors.
    pub fn sum(&self, driver: &impl Driver, column: &str) -> Result<SqlValue> {
        self.aggregate(driver, &Aggregate::Sum(String::from(column)))
    }

    /// Executes an INSERT, UPDATE or DELETE and returns the affected rows.
    ///
    /// # Errors
    ///
    /// Propagates build and driver errors.
    pub fn run(&self, driver: &impl Driver) -> Result<u64> {
        let (sql, params) = self.build()?;
        driver.execute(&sql, &params)
    }

    /// A copy of the builder turned back into a SELECT. Read helpers never
    /// run a pending INSERT, UPDATE or DELETE.
    fn reading(&self) -> Self {
        let mut query = self.clone();
        query.state_mut().operation = Operation::Select;
        query
    }

    fn aggregate(&self, driver: &impl Driver, aggregate: &Aggregate) -> Result<SqlValue> {
        let mut query = self.reading().clear_select();
        {
            let state = query.state_mut();
            state.orders.clear();
            state.limit = None;
            state.offset = None;
        }
        query = query.select_as(&aggregate.to_sql(), aggregate.alias());

        let (sql, params) = query.build()?;
        debug!(aggregate = aggregate.alias(), "running aggregate");
        let rows = driver.fetch_all(&sql, &params)?;
        Ok(rows
            .first()
            .and_then(|r| r.get(aggregate.alias()).or_else(|| r.first_value()))
            .cloned()
            .unwrap_or(SqlValue::Null))
    }
}

/// Builds a driver error from a message.
pub fn driver_error(message: impl Into<String>) -> Error {
    Error::driver(message.into())
}
