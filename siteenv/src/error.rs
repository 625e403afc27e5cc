//! Error types for the siteenv library.
//!
//! This module provides the error hierarchy for loading, resolving and
//! applying environment definitions, using `thiserror` for ergonomic error
//! handling.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a siteenv error.
///
/// # Examples
///
/// ```
/// use siteenv::{Error, Result};
///
/// fn example_operation() -> Result<String> {
///     Ok("dev".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the siteenv library.
///
/// Errors fall in two families. Declarative problems (an unknown role, an
/// invalid group name, a collaborator call that failed outside the command
/// group) are recorded and processing continues. Operational problems (a
/// follow-on command that failed to run, an aborted request) stop the
/// current operation.
#[derive(Debug, Error)]
pub enum Error {
    /// An environment file could not be read, parsed or normalized.
    #[error("failed to load {}: {message}", path.display())]
    Load {
        /// The file that failed to load.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// A requested environment is not defined in any search path.
    #[error("unable to locate an environment definition for '{name}'")]
    UnknownEnvironment {
        /// The environment name that was requested.
        name: String,
    },

    /// The user declined to continue.
    #[error("aborted by user")]
    Aborted,

    /// A group name is not one of modules, variables, permissions, commands.
    #[error("invalid group '{name}'")]
    InvalidGroup {
        /// The unrecognized group name.
        name: String,
    },

    /// A permission section names a role the site does not know.
    #[error("role '{role}' does not exist")]
    UnknownRole {
        /// The role name.
        role: String,
    },

    /// A follow-on command failed to execute.
    #[error("failed to execute command {command}: {reason}")]
    CommandFailed {
        /// The command name.
        command: String,
        /// Why the command failed.
        reason: String,
    },

    /// A call into the site collaborator failed.
    #[error("{operation} failed: {message}")]
    Site {
        /// The operation that was attempted.
        operation: String,
        /// The failure reported by the site.
        message: String,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A YAML document could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An interactive prompt could not be shown.
    #[error("prompt failed: {0}")]
    Prompt(String),
}

impl Error {
    /// Check if this error should stop an apply run immediately.
    ///
    /// # Examples
    ///
    /// ```
    /// use siteenv::Error;
    ///
    /// let err = Error::CommandFailed {
    ///     command: "cache-clear".into(),
    ///     reason: "exit status 1".into(),
    /// };
    /// assert!(err.is_fatal());
    ///
    /// let err = Error::UnknownRole { role: "editor".into() };
    /// assert!(!err.is_fatal());
    /// ```
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::CommandFailed { .. } | Self::Aborted | Self::Io(_) | Self::Prompt(_)
        )
    }

    /// Builds a collaborator error for the given operation.
    pub fn site(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Site {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error() {
        let err = Error::Load {
            path: PathBuf::from("/sites/all/drush/dev.env.drushrc.yml"),
            message: "invalid YAML".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("failed to load"));
        let normalized = display.replace(std::path::MAIN_SEPARATOR, "/");
        assert!(normalized.contains("dev.env.drushrc.yml"));
        assert!(display.contains("invalid YAML"));
    }

    #[test]
    fn test_unknown_environment_error() {
        let err = Error::UnknownEnvironment {
            name: "staging".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unable to locate an environment definition for 'staging'"
        );
    }

    #[test]
    fn test_invalid_group_error() {
        let err = Error::InvalidGroup {
            name: "blocks".to_string(),
        };
        assert!(err.to_string().contains("blocks"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_unknown_role_error() {
        let err = Error::UnknownRole {
            role: "editor".to_string(),
        };
        assert_eq!(err.to_string(), "role 'editor' does not exist");
    }

    #[test]
    fn test_command_failed_is_fatal() {
        let err = Error::CommandFailed {
            command: "updatedb".to_string(),
            reason: "exit status 1".to_string(),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("updatedb"));
    }

    #[test]
    fn test_site_error_helper() {
        let err = Error::site("pm-enable", "module not found");
        assert_eq!(err.to_string(), "pm-enable failed: module not found");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }
}
