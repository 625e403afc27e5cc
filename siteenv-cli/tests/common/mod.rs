//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - A temporary site root with environment files
//! - A stand-in for the site-management tool that records its arguments
//! - Command builders with isolated search paths

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Variables that would leak the caller's configuration into a test.
const ISOLATED_VARS: [&str; 8] = [
    "SITEENV_TOOL",
    "SITEENV_ROOT",
    "SITEENV_SITE",
    "SITEENV_SEARCH_PATH",
    "SITEENV_STRICT",
    "SITEENV_NO_GLOBAL_PATHS",
    "SITEENV_LOG_MODE",
    "SITEENV_OUTPUT_FORMAT",
];

/// Test environment with an isolated site root.
///
/// The site root holds environment files; a shell script stands in for the
/// site-management tool. The script appends every argument list it gets to
/// `tool.log`, prints `enabled.txt` for module listings, prints a fixed
/// role list, and fails for any command name that has a `fail.<name>`
/// marker file.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Root of the fake site
    pub root: PathBuf,
    /// Path to the fake tool
    pub tool: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment with an empty site root.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = temp_dir.path().join("site");
        fs::create_dir_all(&root).expect("Failed to create site root");
        let tool = temp_dir.path().join("fake-tool");
        let env = Self {
            temp_dir,
            root,
            tool,
        };
        env.write_tool();
        env
    }

    /// Create a test environment with the standard fixtures.
    pub fn with_fixtures() -> Self {
        let env = Self::new();
        env.write("drush/dev.env.drushrc.yml", DEV_ENV);
        env.write("sites/all/drush/debug.env.drushrc.yaml", DEBUG_ENV);
        env.write("drush/env.drushrc.yml", GROUP_ENV);
        env
    }

    fn write_tool(&self) {
        let state = self.temp_dir.path().display();
        let script = format!(
            r#"#!/bin/sh
echo "$*" >> "{state}/tool.log"
for arg in "$@"; do
  if [ -f "{state}/fail.$arg" ]; then
    exit 1
  fi
done
case "$*" in
  *pm-list*) cat "{state}/enabled.txt" 2>/dev/null ;;
  *role-list*) echo '{{"1": {{"label": "anonymous user"}}, "2": {{"label": "authenticated user"}}}}' ;;
esac
exit 0
"#
        );
        fs::write(&self.tool, script).expect("Failed to write fake tool");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.tool)
                .expect("Failed to stat fake tool")
                .permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&self.tool, perms).expect("Failed to chmod fake tool");
        }
    }

    /// Write a file below the site root, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    /// Mark modules as enabled on the fake site.
    pub fn enable(&self, modules: &[&str]) {
        let listing: String = modules.iter().map(|m| format!("{m}\n")).collect();
        fs::write(self.temp_dir.path().join("enabled.txt"), listing)
            .expect("Failed to write module list");
    }

    /// Make the fake tool fail whenever `name` appears in its arguments.
    pub fn fail_on(&self, name: &str) {
        fs::write(self.temp_dir.path().join(format!("fail.{name}")), "")
            .expect("Failed to write failure marker");
    }

    /// Argument lists the fake tool has received, one per call.
    pub fn tool_calls(&self) -> Vec<String> {
        fs::read_to_string(self.temp_dir.path().join("tool.log"))
            .map(|log| log.lines().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Get a bare command builder with a clean environment.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("siteenv").expect("Failed to find siteenv binary");
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get a command builder pointed at this site and the fake tool.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--root")
            .arg(&self.root)
            .arg("--tool")
            .arg(&self.tool)
            .arg("--no-global-paths");
        cmd
    }

    /// Get the site root.
    pub fn path(&self) -> &Path {
        &self.root
    }
}

/// A development environment.
#[allow(dead_code)]
pub const DEV_ENV: &str = r#"
modules:
  enable: [devel, views_ui]
  disable: [overlay]
variables:
  cache: 0
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
    disable: [devel]
  variables:
    cache: 1
stage:
  variables:
    cache: 1
"#;
