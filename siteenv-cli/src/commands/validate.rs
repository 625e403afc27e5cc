//! Command to validate an environment file.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Args;
use siteenv::environment::{load_file, EnvFileKind};
use siteenv::LoadOptions;
use std::path::PathBuf;

/// Validate an environment file.
#[derive(Args)]
pub struct ValidateCommand {
    /// Environment file to validate
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl ValidateCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Check file exists
        if !self.file.is_file() {
            return Err(CliError::InvalidArguments(format!(
                "File not found: {}",
                self.file.display()
            )));
        }

        // 2. Only names the loader would pick up can be validated
        let filename = self
            .file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("");
        if EnvFileKind::from_file_name(filename).is_none() {
            return Err(CliError::InvalidArguments(format!(
                "'{filename}' is not an environment file name \
                 (expected NAME.env.drushrc.yml or env.drushrc.yml)"
            )));
        }

        // 3. Parse and normalize every environment in it
        let options = LoadOptions {
            site_root: global.root.clone(),
            strict: true,
        };
        let environments = match load_file(&self.file, &options) {
            Ok(environments) => environments,
            Err(e) => {
                eprintln!("Parse error: {e}");
                return Err(CliError::SemanticFailure(
                    "Environment file is invalid".to_string(),
                ));
            }
        };

        // 4. Report what was found
        println!("Environment file is valid");
        for env in &environments {
            println!("  {}", env.name);
            for section in &env.definition.unknown_sections {
                global
                    .logger
                    .warn(&format!("{}: I'm not sure what to do with '{section}'.", env.name));
            }
        }

        Ok(())
    }
}
