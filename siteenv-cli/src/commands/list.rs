//! List command implementation.
//!
//! This module implements the `list` command, which displays the
//! environments found in the search paths in table or JSON form.

use crate::error::CliError;
use crate::utils::{build_settings, load_catalog, GlobalOptions};
use clap::{Args, ValueEnum};
use siteenv::{Environment, Group};
use std::io::Write;

/// Column headers for table output.
const COLUMN_HEADERS: [&str; 3] = ["name", "source", "groups"];

/// List available environments.
#[derive(Args)]
pub struct ListCommand {
    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "table",
        env = "SITEENV_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,
}

/// Output format for list command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let settings = build_settings(global)?;
        let catalog = load_catalog(&settings)?;
        let environments: Vec<&Environment> = catalog.iter().collect();

        match self.format {
            OutputFormat::Table => format_as_table(&environments)?,
            OutputFormat::Json => format_as_json(&environments)?,
        }

        Ok(())
    }
}

/// Names of the groups an environment defines.
fn defined_groups(environment: &Environment) -> Vec<&'static str> {
    Group::ALL
        .into_iter()
        .filter(|group| !environment.definition.is_group_empty(*group))
        .map(Group::as_str)
        .collect()
}

/// Format environments as a human-readable table.
fn format_as_table(environments: &[&Environment]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    if environments.is_empty() {
        writeln!(handle, "No environment definitions found.")?;
        return Ok(());
    }

    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;

    for env in environments {
        let groups = defined_groups(env);
        writeln!(
            handle,
            "{}\t{}\t{}",
            env.name,
            env.source.display(),
            if groups.is_empty() {
                "-".to_string()
            } else {
                groups.join(",")
            },
        )?;
    }

    Ok(())
}

/// Format environments as JSON.
fn format_as_json(environments: &[&Environment]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let json_data: Vec<serde_json::Value> = environments
        .iter()
        .map(|env| {
            serde_json::json!({
                "name": env.name,
                "source": env.source.display().to_string(),
                "groups": defined_groups(env),
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut handle, &json_data)
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

    writeln!(handle)?;

    Ok(())
}
