//! Shell completion generation command.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use siteenv::LogLevel;
use std::io::{self, Write};

/// Generate shell completion scripts
#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    ///
    /// The script goes to standard output; a one-line install hint goes to
    /// standard error so the script can be redirected as is.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        if global.logger.level() > LogLevel::Quiet {
            eprintln!("# {}", install_hint(self.shell));
        }
        write_script(self.shell, &mut io::stdout())?;
        Ok(())
    }
}

/// Writes the completion script for `shell`.
fn write_script(shell: Shell, out: &mut impl Write) -> io::Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
    out.flush()
}

/// Where the script for `shell` is usually installed.
fn install_hint(shell: Shell) -> String {
    let target = match shell {
        Shell::Bash => "~/.local/share/bash-completion/completions/siteenv",
        Shell::Zsh => "a directory on $fpath as _siteenv",
        Shell::Fish => "~/.config/fish/completions/siteenv.fish",
        Shell::PowerShell => "$PROFILE",
        _ => return format!("siteenv completions {shell} > <completion file>"),
    };
    format!("siteenv completions {shell} > {target}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_names_binary_and_commands() {
        let mut script = Vec::new();
        write_script(Shell::Bash, &mut script).unwrap();
        let script = String::from_utf8(script).unwrap();
        assert!(script.contains("siteenv"));
        assert!(script.contains("apply"));
        assert!(script.contains("--search-path"));
    }

    #[test]
    fn test_install_hint_per_shell() {
        assert!(install_hint(Shell::Bash).starts_with("siteenv completions bash > "));
        assert!(install_hint(Shell::Fish).ends_with("siteenv.fish"));
        assert!(install_hint(Shell::Elvish).contains("<completion file>"));
    }
}
