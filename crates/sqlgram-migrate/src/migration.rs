//! The migration trait.

use sqlgram_core::Schema;

/// A reversible schema change.
///
/// `up` and `down` describe their DDL through a [`Schema`] recorder; the
/// migrator compiles them with the active dialect and executes the result.
///
/// ```rust
/// use sqlgram_core::Schema;
/// use sqlgram_migrate::Migration;
///
/// struct CreateUsers;
///
/// impl Migration for CreateUsers {
///     fn name(&self) -> &str {
///         "0001_create_users"
///     }
///
///     fn up(&self, schema: &mut Schema<'_>) -> sqlgram_core::Result<()> {
///         schema.create("users", |t| {
///             t.id("id");
///             t.string("email").unique();
///             Ok(())
///         })
///     }
///
///     fn down(&self, schema: &mut Schema<'_>) -> sqlgram_core::Result<()> {
///         schema.drop_if_exists("users");
///         Ok(())
///     }
/// }
/// ```
pub trait Migration: Send + Sync {
    /// Unique name, recorded in the history table.
    fn name(&self) -> &str;

    /// Applies the change.
    ///
    /// # Errors
    ///
    /// Propagates blueprint and compilation errors.
    fn up(&self, schema: &mut Schema<'_>) -> sqlgram_core::Result<()>;

    /// Reverts the change.
    ///
    /// # Errors
    ///
    /// Propagates blueprint and compilation errors.
    fn down(&self, schema: &mut Schema<'_>) -> sqlgram_core::Result<()>;
}
