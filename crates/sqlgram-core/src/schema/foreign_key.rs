//! Foreign key descriptors and owning-column resolution.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

use super::column::Column;

/// Referential action for ON DELETE / ON UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForeignKeyAction {
    /// Reject the change while referencing rows exist.
    Restrict,
    /// Propagate the change.
    Cascade,
    /// Set referencing columns to NULL.
    SetNull,
    /// Deferred check of the constraint.
    NoAction,
    /// Set referencing columns to their default.
    SetDefault,
}

impl ForeignKeyAction {
    /// Returns the SQL keywords.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::NoAction => "NO ACTION",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

impl FromStr for ForeignKeyAction {
    type Err = Error;

    /// Parses an action name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RESTRICT" => Ok(Self::Restrict),
            "CASCADE" => Ok(Self::Cascade),
            "SET NULL" => Ok(Self::SetNull),
            "NO ACTION" => Ok(Self::NoAction),
            "SET DEFAULT" => Ok(Self::SetDefault),
            _ => Err(Error::InvalidForeignKeyAction(String::from(s))),
        }
    }
}

impl fmt::Display for ForeignKeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A foreign key declared on a blueprint.
///
/// The owning table is the blueprint's table. When no owning column is set
/// the schema grammar falls back to [`resolve_owning_column`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Owning table.
    pub table: String,
    /// Owning column, guessed from the name when unset.
    pub column: Option<String>,
    /// Explicit constraint name.
    pub name: Option<String>,
    /// Referenced table.
    pub referenced_table: Option<String>,
    /// Referenced column, `id` by default.
    pub referenced_column: String,
    /// ON DELETE action.
    pub on_delete: Option<ForeignKeyAction>,
    /// ON UPDATE action.
    pub on_update: Option<ForeignKeyAction>,
}

impl ForeignKey {
    /// Creates a foreign key owned by `table`, referencing `id` by default.
    #[must_use]
    pub fn new(table: &str, column: Option<&str>) -> Self {
        Self {
            table: String::from(table),
            column: column.map(String::from),
            name: None,
            referenced_table: None,
            referenced_column: String::from("id"),
            on_delete: None,
            on_update: None,
        }
    }

    /// Sets the owning column, bypassing the naming-convention guess.
    pub fn column(&mut self, column: &str) -> &mut Self {
        self.column = Some(String::from(column));
        self
    }

    /// Sets an explicit constraint name.
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.name = Some(String::from(name));
        self
    }

    /// Sets the referenced column.
    pub fn references(&mut self, column: &str) -> &mut Self {
        self.referenced_column = String::from(column);
        self
    }

    /// Sets the referenced table.
    pub fn on(&mut self, table: &str) -> &mut Self {
        self.referenced_table = Some(String::from(table));
        self
    }

    /// Sets the ON DELETE action from its SQL name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidForeignKeyAction`] for an unknown action.
    pub fn on_delete(&mut self, action: &str) -> Result<&mut Self> {
        self.on_delete = Some(action.parse()?);
        Ok(self)
    }

    /// Sets the ON UPDATE action from its SQL name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidForeignKeyAction`] for an unknown action.
    pub fn on_update(&mut self, action: &str) -> Result<&mut Self> {
        self.on_update = Some(action.parse()?);
        Ok(self)
    }

    /// Sets the ON DELETE action.
    pub fn on_delete_action(&mut self, action: ForeignKeyAction) -> &mut Self {
        self.on_delete = Some(action);
        self
    }

    /// Sets the ON UPDATE action.
    pub fn on_update_action(&mut self, action: ForeignKeyAction) -> &mut Self {
        self.on_update = Some(action);
        self
    }

    /// The explicit name, or `FK_<referenced>_<owning>`.
    #[must_use]
    pub fn constraint_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            format!(
                "FK_{}_{}",
                self.referenced_table.as_deref().unwrap_or_default(),
                self.table
            )
        })
    }
}

/// Returns the owning column of a foreign key.
///
/// An explicit column wins. Otherwise the constraint name is parsed as
/// `FK_<referenced>_<owning>` and `columns` is searched for
/// `<referenced>_id`, then `<referenced>Id`.
///
/// # Errors
///
/// Returns [`Error::GuessFailed`] when the name does not follow the
/// convention or no declared column matches.
pub fn resolve_owning_column(foreign_key: &ForeignKey, columns: &[Column]) -> Result<String> {
    if let Some(column) = &foreign_key.column {
        return Ok(column.clone());
    }

    let constraint = foreign_key.constraint_name();
    let fail = |reason: String| Error::GuessFailed {
        constraint: constraint.clone(),
        reason,
    };

    let rest = constraint
        .strip_prefix("FK_")
        .ok_or_else(|| fail(String::from("name does not follow FK_<referenced>_<owning>")))?;
    let owning_suffix = format!("_{}", foreign_key.table);
    let referenced = match rest.strip_suffix(owning_suffix.as_str()) {
        Some(referenced) => referenced,
        None => rest.split_once('_').map_or("", |(referenced, _)| referenced),
    };
    if referenced.is_empty() {
        return Err(fail(String::from(
            "name does not follow FK_<referenced>_<owning>",
        )));
    }

    let candidates = [format!("{referenced}_id"), format!("{referenced}Id")];
    candidates
        .iter()
        .find(|candidate| columns.iter().any(|c| c.name == **candidate))
        .cloned()
        .ok_or_else(|| {
            fail(format!(
                "no column named {} or {}",
                candidates[0], candidates[1]
            ))
        })
}
