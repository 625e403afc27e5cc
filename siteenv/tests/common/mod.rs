//! Common test utilities for integration tests.
//!
//! This module provides an in-memory site and fixture builders for testing
//! the siteenv library.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use siteenv::environment::CommandSpec;
use siteenv::{Error, Result, Site};

/// A site held entirely in memory.
///
/// Every call is applied to the in-memory state and counted, so tests can
/// check both the end state and how many changes were made.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct MemorySite {
    pub enabled: BTreeSet<String>,
    pub variables: BTreeMap<String, Value>,
    pub roles: BTreeMap<String, String>,
    pub permissions: BTreeMap<String, BTreeSet<String>>,
    pub invoked: Vec<CommandSpec>,
    pub failing_commands: BTreeSet<String>,
    pub module_calls: usize,
}

#[allow(dead_code)]
impl MemorySite {
    /// Creates a site with the two built-in roles.
    pub fn new() -> Self {
        let mut site = Self::default();
        site.roles.insert("anonymous user".into(), "1".into());
        site.roles.insert("authenticated user".into(), "2".into());
        site
    }

    /// Marks modules as already enabled.
    pub fn with_enabled(mut self, modules: &[&str]) -> Self {
        self.enabled.extend(modules.iter().map(|m| (*m).to_string()));
        self
    }

    /// Adds a role.
    pub fn with_role(mut self, name: &str, id: &str) -> Self {
        self.roles.insert(name.into(), id.into());
        self
    }

    /// Makes the named command fail when invoked.
    pub fn failing(mut self, command: &str) -> Self {
        self.failing_commands.insert(command.into());
        self
    }

    /// Permissions granted to a role id.
    pub fn granted(&self, role_id: &str) -> Vec<&str> {
        self.permissions
            .get(role_id)
            .map(|perms| perms.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl Site for MemorySite {
    fn module_enabled(&mut self, module: &str) -> Result<bool> {
        Ok(self.enabled.contains(module))
    }

    fn enable_modules(&mut self, modules: &[String]) -> Result<()> {
        self.module_calls += 1;
        self.enabled.extend(modules.iter().cloned());
        Ok(())
    }

    fn disable_modules(&mut self, modules: &[String]) -> Result<()> {
        self.module_calls += 1;
        for module in modules {
            self.enabled.remove(module);
        }
        Ok(())
    }

    fn set_variable(&mut self, name: &str, value: &Value) -> Result<()> {
        self.variables.insert(name.into(), value.clone());
        Ok(())
    }

    fn delete_variable(&mut self, name: &str) -> Result<()> {
        self.variables.remove(name);
        Ok(())
    }

    fn role_id(&mut self, role: &str) -> Result<Option<String>> {
        Ok(self.roles.get(role).cloned())
    }

    fn grant_permissions(&mut self, role_id: &str, permissions: &[String]) -> Result<()> {
        self.permissions
            .entry(role_id.into())
            .or_default()
            .extend(permissions.iter().cloned());
        Ok(())
    }

    fn revoke_permissions(&mut self, role_id: &str, permissions: &[String]) -> Result<()> {
        if let Some(granted) = self.permissions.get_mut(role_id) {
            for permission in permissions {
                granted.remove(permission);
            }
        }
        Ok(())
    }

    fn invoke(&mut self, command: &CommandSpec) -> Result<()> {
        self.invoked.push(command.clone());
        if self.failing_commands.contains(&command.name) {
            return Err(Error::site(command.name.clone(), "exit status 1"));
        }
        Ok(())
    }
}

/// Writes a file below `dir`, creating parent directories.
#[allow(dead_code)]
pub fn write_file(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create fixture directory");
    }
    fs::write(&path, contents).expect("failed to write fixture");
    path
}

/// A development environment.
#[allow(dead_code)]
pub const DEV_ENV: &str = r#"
modules:
  enable: [devel, views_ui]
  disable: [overlay]
variables:
  cache: 0
  preprocess_css: 0
  error_level: 2
permissions:
  anonymous user:
    access devel information: 1
commands:
  cache-clear: ["@self", "-y", all]
"#;

/// A debugging overlay for the development environment.
#[allow(dead_code)]
pub const DEBUG_ENV: &str = r#"
modules:
  enable: [stage_file_proxy]
variables:
  error_level: 1
  old_setting: "[DELETE]"
commands:
  - {0: "@self", name: updatedb, 1: "-y"}
"#;

/// A group file defining two environments.
#[allow(dead_code)]
pub const GROUP_ENV: &str = r#"
prod:
  modules:
    disable: [devel, views_ui]
  variables:
    cache: 1
    preprocess_css: 1
  permissions:
    anonymous user:
      access devel information: 0
stage:
  variables:
    cache: 1
"#;
