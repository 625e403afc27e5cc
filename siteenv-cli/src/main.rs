//! Main entry point for the siteenv CLI.
//!
//! This is the command-line interface for declarative site environments.
//! It provides commands for working with environment definitions:
//! - `apply`: Bring a site into the state an environment declares
//! - `summary`: Show what an environment would change
//! - `list`: List the environments found in the search paths
//! - `validate`: Check one environment file

mod cli;
mod commands;
mod error;
mod tool_site;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let logger = siteenv::init_logger(cli.verbose, cli.quiet);
    let _ = env_logger::Builder::new()
        .filter_level(logger.level().as_filter())
        .parse_default_env()
        .try_init();

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        logger,
        root: cli.root,
        site: cli.site,
        tool: cli.tool,
        search_paths: cli.search_paths,
        strict: cli.strict,
        no_global_paths: cli.no_global_paths,
        yes: cli.yes,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Apply(cmd) => cmd.execute(&global),
        cli::Command::Summary(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
