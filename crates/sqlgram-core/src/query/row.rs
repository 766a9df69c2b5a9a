//! Ordered column → value mappings used for insert payloads, update
//! assignments and fetched result rows.

use crate::value::{SqlValue, ToSqlValue};

/// An ordered column → value mapping. Setting an existing column replaces
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, SqlValue)>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets a column and returns the row.
    #[must_use]
    pub fn with<T: ToSqlValue>(mut self, column: impl Into<String>, value: T) -> Self {
        self.set(column, value);
        self
    }

    /// Sets a column.
    pub fn set<T: ToSqlValue>(&mut self, column: impl Into<String>, value: T) {
        let column = column.into();
        let value = value.to_sql_value();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Returns the value of a column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Iterates over the column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates over `(column, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the first value of the row.
    #[must_use]
    pub fn first_value(&self) -> Option<&SqlValue> {
        self.entries.first().map(|(_, value)| value)
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true when both rows hold exactly the same set of columns,
    /// regardless of order.
    #[must_use]
    pub fn same_columns(&self, other: &Self) -> bool {
        self.len() == other.len() && self.columns().all(|c| other.get(c).is_some())
    }

    pub(crate) fn column_list(&self) -> String {
        self.columns().collect::<Vec<_>>().join(", ")
    }
}

impl<K: Into<String>, V: ToSqlValue, const N: usize> From<[(K, V); N]> for Row {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: Into<String>, V: ToSqlValue> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}

impl IntoIterator for Row {
    type Item = (String, SqlValue);
    type IntoIter = std::vec::IntoIter<(String, SqlValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Conversion into a list of insert rows: a single [`Row`] or a collection.
pub trait IntoRows {
    /// Converts into rows.
    fn into_rows(self) -> Vec<Row>;
}

impl IntoRows for Row {
    fn into_rows(self) -> Vec<Row> {
        vec![self]
    }
}

impl IntoRows for Vec<Row> {
    fn into_rows(self) -> Vec<Row> {
        self
    }
}

impl<const N: usize> IntoRows for [Row; N] {
    fn into_rows(self) -> Vec<Row> {
        self.into_iter().collect()
    }
}
