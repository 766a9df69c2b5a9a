//! Aggregate expressions used by the driver conveniences.

/// An aggregate function applied to a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aggregate {
    /// COUNT aggregate
    Count {
        /// Column to count, or "*" for all rows
        column: String,
        /// Whether to count only distinct values
        distinct: bool,
    },
    /// SUM aggregate
    Sum(String),
    /// AVG aggregate
    Avg(String),
    /// MAX aggregate
    Max(String),
    /// MIN aggregate
    Min(String),
}

impl Aggregate {
    /// Creates a COUNT(*) aggregate.
    #[must_use]
    pub fn count_all() -> Self {
        Self::Count {
            column: String::from("*"),
            distinct: false,
        }
    }

    /// Creates a COUNT(DISTINCT column) aggregate.
    #[must_use]
    pub fn count_distinct(column: &str) -> Self {
        Self::Count {
            column: String::from(column),
            distinct: true,
        }
    }

    /// Returns the SQL expression.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Count { column, distinct } => {
                if *distinct {
                    format!("COUNT(DISTINCT {column})")
                } else {
                    format!("COUNT({column})")
                }
            }
            Self::Sum(column) => format!("SUM({column})"),
            Self::Avg(column) => format!("AVG({column})"),
            Self::Max(column) => format!("MAX({column})"),
            Self::Min(column) => format!("MIN({column})"),
        }
    }

    /// Alias the driver conveniences select the result under.
    #[must_use]
    pub const fn alias(&self) -> &'static str {
        match self {
            Self::Count { .. } => "aggregate_count",
            Self::Sum(_) => "aggregate_sum",
            Self::Avg(_) => "aggregate_avg",
            Self::Max(_) => "aggregate_max",
            Self::Min(_) => "aggregate_min",
        }
    }
}
