//! Tool settings and `SITEENV_*` environment variable overrides.
//!
//! Settings are layered: built-in defaults, then environment variables,
//! then whatever the caller (usually the CLI) sets explicitly.

use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default binary of the site-management tool.
pub const DEFAULT_TOOL: &str = "drush";

/// Default site directory name under `sites/`.
pub const DEFAULT_SITE: &str = "default";

/// Settings for discovering and applying environments.
///
/// # Examples
///
/// ```
/// use siteenv::Settings;
/// use std::path::PathBuf;
///
/// let settings = Settings::default()
///     .with_site_root("/var/www/html")
///     .with_search_path("/srv/envs")
///     .skip_global_contexts();
///
/// assert_eq!(settings.tool, "drush");
/// assert_eq!(settings.search_paths, vec![PathBuf::from("/srv/envs")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Binary used to run commands against the site.
    pub tool: String,
    /// Root directory of the site installation.
    pub site_root: Option<PathBuf>,
    /// Site directory name under `sites/`.
    pub site: String,
    /// Extra directories to scan, lowest priority first.
    pub search_paths: Vec<PathBuf>,
    /// Abort when an environment file fails to load.
    pub strict: bool,
    /// Scan the system and home contexts.
    pub global_contexts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tool: DEFAULT_TOOL.to_string(),
            site_root: None,
            site: DEFAULT_SITE.to_string(),
            search_paths: Vec::new(),
            strict: false,
            global_contexts: true,
        }
    }
}

impl Settings {
    /// Sets the site root.
    #[must_use]
    pub fn with_site_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.site_root = Some(root.into());
        self
    }

    /// Appends a search path.
    #[must_use]
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    /// Disables the system and home contexts.
    #[must_use]
    pub fn skip_global_contexts(mut self) -> Self {
        self.global_contexts = false;
        self
    }

    /// Applies `SITEENV_*` environment variable overrides.
    ///
    /// - `SITEENV_TOOL`: tool binary
    /// - `SITEENV_ROOT`: site root
    /// - `SITEENV_SITE`: site directory name
    /// - `SITEENV_SEARCH_PATH`: extra search paths (platform path list)
    /// - `SITEENV_STRICT`: abort on broken environment files
    /// - `SITEENV_NO_GLOBAL_PATHS`: skip the system and home contexts
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unparsable boolean.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(tool) = non_empty_var("SITEENV_TOOL") {
            self.tool = tool;
        }

        if let Some(root) = non_empty_var("SITEENV_ROOT") {
            self.site_root = Some(PathBuf::from(root));
        }

        if let Some(site) = non_empty_var("SITEENV_SITE") {
            self.site = site;
        }

        if let Some(paths) = env::var_os("SITEENV_SEARCH_PATH") {
            self.search_paths
                .extend(env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()));
        }

        if let Ok(val) = env::var("SITEENV_STRICT") {
            self.strict = parse_bool("SITEENV_STRICT", &val)?;
        }

        if let Ok(val) = env::var("SITEENV_NO_GLOBAL_PATHS") {
            self.global_contexts = !parse_bool("SITEENV_NO_GLOBAL_PATHS", &val)?;
        }

        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parses a boolean environment value.
///
/// # Errors
///
/// Returns a validation error naming `field` for unrecognized values.
pub fn parse_bool(field: &str, s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::Validation {
            field: field.into(),
            message: format!("Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Sets an environment variable for the lifetime of the guard.
    struct EnvGuard {
        key: &'static str,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn new(key: &'static str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self { key, old_value }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.tool, DEFAULT_TOOL);
        assert_eq!(settings.site, DEFAULT_SITE);
        assert!(settings.global_contexts);
        assert!(!settings.strict);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "yes").unwrap());
        assert!(parse_bool("X", "ON").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        let err = parse_bool("SITEENV_STRICT", "maybe").unwrap_err();
        assert!(err.to_string().contains("SITEENV_STRICT"));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let _tool = EnvGuard::new("SITEENV_TOOL", "/usr/local/bin/drush");
        let _root = EnvGuard::new("SITEENV_ROOT", "/var/www/html");
        let _site = EnvGuard::new("SITEENV_SITE", "example.com");
        let _strict = EnvGuard::new("SITEENV_STRICT", "true");
        let _global = EnvGuard::new("SITEENV_NO_GLOBAL_PATHS", "1");
        let joined = env::join_paths(["/srv/a", "/srv/b"]).unwrap();
        let _paths = EnvGuard::new("SITEENV_SEARCH_PATH", joined.to_str().unwrap());

        let mut settings = Settings::default();
        settings.apply_env_overrides().unwrap();

        assert_eq!(settings.tool, "/usr/local/bin/drush");
        assert_eq!(settings.site_root, Some(PathBuf::from("/var/www/html")));
        assert_eq!(settings.site, "example.com");
        assert!(settings.strict);
        assert!(!settings.global_contexts);
        assert_eq!(
            settings.search_paths,
            vec![PathBuf::from("/srv/a"), PathBuf::from("/srv/b")]
        );
    }

    #[test]
    #[serial]
    fn test_env_invalid_bool() {
        let _strict = EnvGuard::new("SITEENV_STRICT", "sometimes");
        let mut settings = Settings::default();
        assert!(matches!(
            settings.apply_env_overrides(),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_empty_env_values_ignored() {
        let _tool = EnvGuard::new("SITEENV_TOOL", "  ");
        let mut settings = Settings::default();
        settings.apply_env_overrides().unwrap();
        assert_eq!(settings.tool, DEFAULT_TOOL);
    }
}
