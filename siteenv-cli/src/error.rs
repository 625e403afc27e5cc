//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use siteenv::Error as LibError;
use std::fmt;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Configuration error.
    Config(String),

    /// Semantic failure (e.g., the environment was only partly applied) - exit code 1.
    SemanticFailure(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Semantic failure (e.g., apply recorded errors)
    /// - 2: Aborted at a prompt
    /// - 3: Unknown environment
    /// - 4: Invalid arguments
    /// - 5: I/O error
    /// - 6: Other library error
    /// - 7: Configuration error
    /// - 8: A follow-on command failed
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::SemanticFailure(_) => 1,
            CliError::Library(lib_err) => match lib_err {
                LibError::Aborted => 2,
                LibError::UnknownEnvironment { .. } => 3,
                LibError::Io(_) => 5,
                LibError::Validation { .. } => 7,
                LibError::CommandFailed { .. } => 8,
                _ => 6,
            },
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
            CliError::SemanticFailure(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exit_codes() {
        assert_eq!(CliError::from(LibError::Aborted).exit_code(), 2);
        assert_eq!(
            CliError::from(LibError::UnknownEnvironment { name: "x".into() }).exit_code(),
            3
        );
        assert_eq!(
            CliError::from(LibError::CommandFailed {
                command: "updatedb".into(),
                reason: "exit status 1".into(),
            })
            .exit_code(),
            8
        );
        assert_eq!(
            CliError::from(LibError::UnknownRole { role: "editor".into() }).exit_code(),
            6
        );
    }

    #[test]
    fn test_cli_exit_codes() {
        assert_eq!(CliError::SemanticFailure("partial".into()).exit_code(), 1);
        assert_eq!(CliError::InvalidArguments("bad".into()).exit_code(), 4);
        assert_eq!(CliError::Config("bad".into()).exit_code(), 7);
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(CliError::from(io).exit_code(), 5);
    }

    #[test]
    fn test_display() {
        let err = CliError::InvalidArguments("missing environment".into());
        assert_eq!(err.to_string(), "Invalid arguments: missing environment");
    }
}
