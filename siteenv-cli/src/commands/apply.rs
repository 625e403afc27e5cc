//! Apply command implementation.
//!
//! This module implements the `apply` command, which resolves an
//! environment request and brings the site into the declared state.

use crate::error::CliError;
use crate::tool_site::ToolSite;
use crate::utils::{build_settings, confirmer, console_reporter, load_catalog, GlobalOptions};
use clap::Args;
use siteenv::{resolve, Executor, ExecutorOptions, GroupSelection};
use std::path::PathBuf;

/// Apply an environment to the site.
#[derive(Args)]
pub struct ApplyCommand {
    /// Environment name, or several joined with '+' (e.g. dev+debug)
    #[arg(value_name = "ENV")]
    pub environment: String,

    /// Only apply these groups (comma-separated: modules, variables, permissions, commands)
    #[arg(long, value_name = "GROUPS")]
    pub groups: Option<String>,

    /// Configuration file passed to every follow-on command as --config
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
}

impl ApplyCommand {
    /// Execute the apply command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Load settings and every environment definition
        let settings = build_settings(global)?;
        let catalog = load_catalog(&settings)?;

        // 2. Resolve the request into one plan
        let mut reporter = console_reporter(global);
        let mut confirm = confirmer(global);
        let resolution = resolve(
            &self.environment,
            &catalog,
            confirm.as_mut(),
            &mut reporter,
        )?;

        // 3. Apply it through the tool
        let selection = self
            .groups
            .as_deref()
            .map_or_else(GroupSelection::all, GroupSelection::parse);
        let mut options = ExecutorOptions::new(settings.tool.clone());
        if let Some(config_file) = self.config_file {
            options = options.with_config_file(config_file);
        }

        let mut site =
            ToolSite::new(settings.tool, settings.site_root).with_site(&settings.site);
        let report =
            Executor::new(&mut site, &mut reporter, options).apply(&resolution, &selection)?;

        if report.is_success() {
            Ok(())
        } else {
            Err(CliError::SemanticFailure(format!(
                "Environment applied with {} error(s)",
                report.errors.len()
            )))
        }
    }
}
