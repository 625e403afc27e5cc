//! Rendering of commands and headings.

use crate::environment::{CommandSpec, OptionValue};
use crate::settings::DEFAULT_TOOL;

/// Options that are plumbing and never shown.
const HIDDEN_OPTIONS: [&str; 1] = ["config"];

/// Option hoisted to the short `-y` flag.
const YES_OPTION: &str = "yes";

/// ANSI style applied to headings: bold green on black.
const HEADING_STYLE: &str = "\x1b[1;32;40m\x1b[1m";
const RESET_STYLE: &str = "\x1b[0m";

/// Renders commands as the invocation a user would type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFormatter {
    tool: String,
}

impl Default for CommandFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL)
    }
}

impl CommandFormatter {
    /// Creates a formatter for the given tool binary.
    #[must_use]
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    /// The tool binary name.
    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Renders a command as `<tool> <alias> [-y] <name> [args] [--opts]`.
    ///
    /// The `yes` option is rendered as `-y` right after the alias and the
    /// `config` option is never rendered.
    ///
    /// # Examples
    ///
    /// ```
    /// use siteenv::environment::CommandSpec;
    /// use siteenv::output::CommandFormatter;
    ///
    /// let cmd = CommandSpec::new("mycommand")
    ///     .with_alias("@test")
    ///     .with_flag("yes")
    ///     .with_argument("arg1val")
    ///     .with_flag("opt1")
    ///     .with_option("opt2", "0")
    ///     .with_option("config", "/etc/drushrc.php");
    ///
    /// assert_eq!(
    ///     CommandFormatter::default().render(&cmd),
    ///     "drush @test -y mycommand arg1val --opt1 --opt2=0"
    /// );
    /// ```
    #[must_use]
    pub fn render(&self, command: &CommandSpec) -> String {
        let mut parts = vec![self.tool.clone(), command.alias.clone()];

        if command.options.contains_key(YES_OPTION) {
            parts.push("-y".to_string());
        }

        parts.push(command.name.clone());
        parts.extend(command.arguments.iter().cloned());

        for (name, value) in command.options.iter() {
            if name == YES_OPTION || HIDDEN_OPTIONS.contains(&name) {
                continue;
            }
            parts.push(match value {
                OptionValue::Flag => format!("--{name}"),
                OptionValue::Value(value) => format!("--{name}={value}"),
            });
        }

        parts.join(" ")
    }
}

/// Formats a heading: words capitalized, `line_ending` appended, styled.
///
/// # Examples
///
/// ```
/// use siteenv::output::format_heading;
///
/// assert_eq!(
///     format_heading("modules", ":"),
///     "\x1b[1;32;40m\x1b[1mModules:\x1b[0m"
/// );
/// ```
#[must_use]
pub fn format_heading(text: &str, line_ending: &str) -> String {
    format!("{HEADING_STYLE}{}{line_ending}{RESET_STYLE}", capitalize_words(text))
}

/// Uppercases the first character of every space-separated word.
///
/// # Examples
///
/// ```
/// use siteenv::output::capitalize_words;
///
/// assert_eq!(capitalize_words("environment definitions found"), "Environment Definitions Found");
/// assert_eq!(capitalize_words("already UPPER"), "Already UPPER");
/// ```
#[must_use]
pub fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}

/// Renders pairs as an aligned `key : value` list.
///
/// # Examples
///
/// ```
/// use siteenv::output::key_value_lines;
///
/// let lines = key_value_lines([("Enable", "devel, views"), ("Disable", "overlay")]);
/// assert_eq!(lines, vec!["Enable  : devel, views", "Disable : overlay"]);
/// ```
pub fn key_value_lines<K, V, I>(pairs: I) -> Vec<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
    I: IntoIterator<Item = (K, V)>,
{
    let pairs: Vec<(K, V)> = pairs.into_iter().collect();
    let width = pairs
        .iter()
        .map(|(k, _)| k.as_ref().chars().count())
        .max()
        .unwrap_or(0);
    pairs
        .iter()
        .map(|(k, v)| format!("{:<width$} : {}", k.as_ref(), v.as_ref()))
        .collect()
}
