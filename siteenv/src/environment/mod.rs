//! Environment definitions.
//!
//! An environment is a named, declarative description of how a site should
//! be configured: which modules are enabled or disabled, which variables are
//! set, which permissions each role has, and which follow-on commands run.
//!
//! # Lifecycle
//!
//! 1. [`SearchPaths::discover`] lists the directories to scan.
//! 2. [`Catalog::load`] reads every environment file found there.
//! 3. [`resolve`] merges the environments named in a request such as
//!    `dev+debug` into one [`ExecutionPlan`].
//! 4. The plan is applied by [`crate::operations::Executor`] or printed by
//!    [`crate::output::print_summary`].
//!
//! # Examples
//!
//! ```
//! use siteenv::environment::{loader::parse_definition, Catalog, Environment, resolve, AssumeNo};
//! use siteenv::output::RecordingReporter;
//!
//! let yaml = r#"
//! modules:
//!   enable: [devel]
//! variables:
//!   cache: 0
//! "#;
//! let definition = parse_definition(serde_yaml::from_str(yaml).unwrap()).unwrap();
//!
//! let mut catalog = Catalog::new();
//! catalog.insert(Environment {
//!     name: "dev".into(),
//!     definition,
//!     source: "drush/dev.env.drushrc.yml".into(),
//! });
//!
//! let mut reporter = RecordingReporter::default();
//! let resolution = resolve("dev", &catalog, &mut AssumeNo, &mut reporter).unwrap();
//! assert_eq!(resolution.plan.modules.enabled(), &["devel".to_string()]);
//! ```

pub mod command;
pub mod loader;
pub mod merger;
pub mod paths;
pub mod resolver;
pub mod schema;

pub use loader::{load_file, Catalog, EnvFileKind, LoadOptions};
pub use merger::PlanMerger;
pub use paths::SearchPaths;
pub use resolver::{resolve, split_request, AssumeNo, AssumeYes, Confirm, Resolution};
pub use schema::{
    CommandSpec, Definition, Environment, ExecutionPlan, Grant, Group, ModuleSpec, ModuleStatus,
    OptionValue, OrderedMap, DELETE_SENTINEL, SELF_ALIAS,
};
