#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # siteenv
//!
//! A library for declaring site environments and applying them.
//!
//! An environment is a YAML document that describes modules, variables,
//! role permissions and follow-on commands. Environments are discovered in a
//! layered set of directories, composed with `+` (`dev+debug`), and applied
//! idempotently to a site through the site-management tool.
//!
//! ## Core Types
//!
//! - [`environment::Catalog`]: every environment found in the search paths
//! - [`environment::ExecutionPlan`]: the merged definition for a request
//! - [`operations::Executor`] and [`operations::Site`]: applying a plan
//! - [`output::Reporter`]: where progress goes
//! - [`Settings`]: tool, site root and search path configuration
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use siteenv::environment::command::normalize_command;
//! use siteenv::output::CommandFormatter;
//!
//! let body: serde_yaml::Value = serde_yaml::from_str(r#"["@dev", "-y", "all"]"#).unwrap();
//! let cmd = normalize_command(&serde_yaml::Value::from("cache-clear"), &body).unwrap();
//!
//! assert_eq!(CommandFormatter::default().render(&cmd), "drush @dev -y cache-clear all");
//! ```

pub mod environment;
pub mod error;
pub mod logging;
pub mod operations;
pub mod output;
pub mod settings;

// Re-export key types at crate root for convenience
pub use environment::{
    resolve, Catalog, CommandSpec, Definition, Environment, ExecutionPlan, Group, LoadOptions,
    Resolution, SearchPaths,
};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{ApplyReport, Executor, ExecutorOptions, GroupSelection, Site};
pub use settings::Settings;
