//! Summary command implementation.
//!
//! This module implements the `summary` command, a dry run that prints
//! what applying an environment would change.

use crate::error::CliError;
use crate::utils::{build_settings, confirmer, console_reporter, load_catalog, GlobalOptions};
use clap::Args;
use siteenv::output::{print_summary, CommandFormatter};
use siteenv::resolve;

/// Show what an environment would change.
#[derive(Args)]
pub struct SummaryCommand {
    /// Environment name, or several joined with '+' (e.g. dev+debug)
    #[arg(value_name = "ENV")]
    pub environment: String,
}

impl SummaryCommand {
    /// Execute the summary command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let settings = build_settings(global)?;
        let catalog = load_catalog(&settings)?;

        let mut reporter = console_reporter(global);
        let mut confirm = confirmer(global);
        let resolution = resolve(
            &self.environment,
            &catalog,
            confirm.as_mut(),
            &mut reporter,
        )?;

        print_summary(
            &resolution,
            &CommandFormatter::new(settings.tool),
            &mut reporter,
        );
        Ok(())
    }
}
