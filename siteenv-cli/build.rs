//! Build script for siteenv-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("siteenv")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Apply declarative site environments")
        .long_about(
            "Command-line tool for declaring site environments in YAML and applying them \
             idempotently through the site-management tool",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .help("Root directory of the site installation")
                .value_name("PATH")
                .global(true)
                .env("SITEENV_ROOT"),
        )
        .arg(
            Arg::new("site")
                .long("site")
                .help("Site directory name under sites/")
                .value_name("NAME")
                .global(true)
                .env("SITEENV_SITE"),
        )
        .arg(
            Arg::new("tool")
                .long("tool")
                .help("Site-management tool used to apply changes")
                .value_name("BINARY")
                .global(true)
                .env("SITEENV_TOOL"),
        )
        .arg(
            Arg::new("search-path")
                .long("search-path")
                .help("Extra directory to search for environment files (repeatable)")
                .value_name("PATH")
                .global(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Abort when an environment file fails to load")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-global-paths")
                .long("no-global-paths")
                .help("Skip the system and home directories")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("yes")
                .short('y')
                .long("yes")
                .help("Answer yes to every question")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommands(vec![
            Command::new("apply")
                .about("Apply an environment to the site")
                .long_about(
                    "Resolve an environment (or several joined with '+') and bring the site \
                     into the declared state",
                ),
            Command::new("summary")
                .about("Show what an environment would change")
                .long_about("Print the merged configuration without touching the site"),
            Command::new("list")
                .about("List available environments")
                .long_about("Display every environment found in the search paths"),
            Command::new("validate")
                .about("Validate an environment file")
                .long_about("Check one environment file for errors"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() -> std::io::Result<()> {
    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").unwrap_or_default());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;

    fs::write(man_dir.join("siteenv.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
