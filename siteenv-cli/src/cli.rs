//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    ApplyCommand, CompletionsCommand, ListCommand, SummaryCommand, ValidateCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for applying declarative site environments.
#[derive(Parser)]
#[command(name = "siteenv")]
#[command(version, about = "Apply declarative site environments", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Root directory of the site installation
    #[arg(long, value_name = "PATH", global = true, env = "SITEENV_ROOT")]
    pub root: Option<PathBuf>,

    /// Site directory name under sites/
    #[arg(long, value_name = "NAME", global = true, env = "SITEENV_SITE")]
    pub site: Option<String>,

    /// Site-management tool used to apply changes
    #[arg(long, value_name = "BINARY", global = true, env = "SITEENV_TOOL")]
    pub tool: Option<String>,

    /// Extra directory to search for environment files (repeatable)
    #[arg(long = "search-path", value_name = "PATH", global = true)]
    pub search_paths: Vec<PathBuf>,

    /// Abort when an environment file fails to load
    #[arg(long, global = true)]
    pub strict: bool,

    /// Skip the system and home directories
    #[arg(long, global = true)]
    pub no_global_paths: bool,

    /// Answer yes to every question
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Apply an environment to the site
    Apply(ApplyCommand),

    /// Show what an environment would change
    Summary(SummaryCommand),

    /// List available environments
    List(ListCommand),

    /// Validate an environment file
    Validate(ValidateCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "siteenv",
            "summary",
            "dev+debug",
            "--root",
            "/var/www",
            "--search-path",
            "/a",
            "--search-path",
            "/b",
            "-y",
        ])
        .unwrap();

        assert_eq!(cli.root, Some(PathBuf::from("/var/www")));
        assert_eq!(cli.search_paths, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert!(cli.yes);
        assert!(matches!(cli.command, Command::Summary(ref s) if s.environment == "dev+debug"));
    }
}
