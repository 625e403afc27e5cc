//! The site an execution plan is applied to.

use serde_yaml::Value;

use crate::environment::CommandSpec;
use crate::error::Result;

/// Operations the executor needs from a live site.
///
/// Implementations talk to the site-management tool; tests use a mock or an
/// in-memory fake.
#[cfg_attr(test, mockall::automock)]
pub trait Site {
    /// Whether a module is currently enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the module list cannot be read.
    fn module_enabled(&mut self, module: &str) -> Result<bool>;

    /// Enables a batch of modules.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool reports a failure.
    fn enable_modules(&mut self, modules: &[String]) -> Result<()>;

    /// Disables a batch of modules.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool reports a failure.
    fn disable_modules(&mut self, modules: &[String]) -> Result<()>;

    /// Sets a variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable cannot be written.
    fn set_variable(&mut self, name: &str, value: &Value) -> Result<()>;

    /// Deletes a variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable cannot be deleted.
    fn delete_variable(&mut self, name: &str) -> Result<()>;

    /// Looks up the id of a role by name; `None` if the role does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the role list cannot be read.
    fn role_id(&mut self, role: &str) -> Result<Option<String>>;

    /// Grants permissions to a role.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool reports a failure.
    fn grant_permissions(&mut self, role_id: &str, permissions: &[String]) -> Result<()>;

    /// Revokes permissions from a role.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool reports a failure.
    fn revoke_permissions(&mut self, role_id: &str, permissions: &[String]) -> Result<()>;

    /// Runs a follow-on command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be started or exited with
    /// a failure.
    fn invoke(&mut self, command: &CommandSpec) -> Result<()>;
}
