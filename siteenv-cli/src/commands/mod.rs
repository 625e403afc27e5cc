//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `apply`: Apply an environment to the site
//! - `summary`: Show what an environment would change
//! - `list`: List available environments
//! - `validate`: Validate an environment file
//! - `completions`: Generate shell completion scripts

pub mod apply;
pub mod completions;
pub mod list;
pub mod summary;
pub mod validate;

pub use apply::ApplyCommand;
pub use completions::CompletionsCommand;
pub use list::ListCommand;
pub use summary::SummaryCommand;
pub use validate::ValidateCommand;
