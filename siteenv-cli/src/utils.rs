//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including settings layering, catalog loading, reporters and prompts.

use crate::error::CliError;
use dialoguer::theme::ColorfulTheme;
use siteenv::environment::{AssumeNo, AssumeYes, Confirm};
use siteenv::output::ConsoleReporter;
use siteenv::{Catalog, LoadOptions, Logger, SearchPaths, Settings};
use std::io::{self, IsTerminal};
use std::path::PathBuf;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Logger built from the verbosity flags.
    pub logger: Logger,

    /// Root directory of the site installation.
    pub root: Option<PathBuf>,

    /// Site directory name.
    pub site: Option<String>,

    /// Site-management tool binary.
    pub tool: Option<String>,

    /// Extra search paths, lowest priority first.
    pub search_paths: Vec<PathBuf>,

    /// Abort when an environment file fails to load.
    pub strict: bool,

    /// Skip the system and home contexts.
    pub no_global_paths: bool,

    /// Answer yes to every question.
    pub yes: bool,
}

/// Build settings from defaults, `SITEENV_*` variables and global options.
///
/// Precedence, highest first:
/// 1. Global options
/// 2. Environment variables
/// 3. Built-in defaults
pub fn build_settings(global: &GlobalOptions) -> Result<Settings, CliError> {
    let mut settings = Settings::default();
    settings
        .apply_env_overrides()
        .map_err(|e| CliError::Config(e.to_string()))?;

    if let Some(tool) = &global.tool {
        settings.tool.clone_from(tool);
    }
    if let Some(root) = &global.root {
        settings.site_root = Some(root.clone());
    }
    if let Some(site) = &global.site {
        settings.site.clone_from(site);
    }
    settings
        .search_paths
        .extend(global.search_paths.iter().cloned());
    settings.strict |= global.strict;
    if global.no_global_paths {
        settings.global_contexts = false;
    }

    Ok(settings)
}

/// Discover the search paths and load every environment definition.
pub fn load_catalog(settings: &Settings) -> Result<Catalog, CliError> {
    let paths = SearchPaths::discover(settings);
    log::debug!("Search paths: {:?}", paths.roots());

    let options = LoadOptions {
        site_root: settings.site_root.clone(),
        strict: settings.strict,
    };
    let catalog = Catalog::load(paths.roots(), &options)?;

    log::debug!(
        "Loaded {} environment(s), skipped {} file(s)",
        catalog.len(),
        catalog.failures().len()
    );

    Ok(catalog)
}

/// A reporter printing to standard output through the global logger.
pub fn console_reporter(global: &GlobalOptions) -> ConsoleReporter<io::Stdout> {
    ConsoleReporter::stdout(global.logger)
}

/// Pick how yes/no questions are answered.
///
/// `--yes` answers yes; an interactive terminal gets a prompt; anything else
/// answers no.
pub fn confirmer(global: &GlobalOptions) -> Box<dyn Confirm> {
    if global.yes {
        Box::new(AssumeYes)
    } else if io::stdin().is_terminal() {
        Box::new(TerminalPrompt)
    } else {
        Box::new(AssumeNo)
    }
}

/// Asks questions on the terminal.
struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&mut self, prompt: &str) -> siteenv::Result<bool> {
        dialoguer::Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| siteenv::Error::Prompt(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global() -> GlobalOptions {
        GlobalOptions {
            logger: Logger::default(),
            root: None,
            site: None,
            tool: None,
            search_paths: Vec::new(),
            strict: false,
            no_global_paths: false,
            yes: false,
        }
    }

    #[test]
    fn test_flags_override_defaults() {
        let mut options = global();
        options.tool = Some("/usr/local/bin/drush".into());
        options.root = Some("/var/www".into());
        options.site = Some("example.com".into());
        options.search_paths = vec!["/srv/envs".into()];
        options.strict = true;
        options.no_global_paths = true;

        let settings = build_settings(&options).unwrap();
        assert_eq!(settings.tool, "/usr/local/bin/drush");
        assert_eq!(settings.site_root, Some(PathBuf::from("/var/www")));
        assert_eq!(settings.site, "example.com");
        assert!(settings.search_paths.contains(&PathBuf::from("/srv/envs")));
        assert!(settings.strict);
        assert!(!settings.global_contexts);
    }

    #[test]
    fn test_yes_flag_confirms() {
        let mut options = global();
        options.yes = true;
        assert!(confirmer(&options).confirm("Continue?").unwrap());
    }
}
