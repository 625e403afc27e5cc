//! Applying execution plans to a site.
//!
//! [`Executor`] walks a resolved plan and drives a [`Site`]. The site is a
//! trait so the same executor runs against the real tool or a test double.
//!
//! # Examples
//!
//! ```
//! use siteenv::environment::Group;
//! use siteenv::operations::{ExecutorOptions, GroupSelection};
//!
//! let options = ExecutorOptions::new("drush").with_config_file("/etc/drush/drushrc.php");
//! assert_eq!(options.tool, "drush");
//!
//! let selection = GroupSelection::parse("variables");
//! assert!(!selection.includes(Group::Commands));
//! ```

pub mod executor;
pub mod site;

pub use executor::{ApplyReport, Executor, ExecutorOptions, GroupSelection};
pub use site::Site;
