//! Command section normalization.
//!
//! A command can be written in three equivalent shapes:
//!
//! ```yaml
//! commands:
//!   # long form
//!   variable-set:
//!     alias: "@dev"
//!     args: [site_name, Dev]
//!     options: {yes: true, exact: true}
//!   # medium form
//!   cache-clear: ["@dev", "-y", all]
//!   # short form, as an anonymous list entry
//!   - {0: "@dev", 1: "-y", name: updatedb, 2: "--entity-updates"}
//! ```
//!
//! All three collapse into one [`CommandSpec`]. The shapes never leave this
//! module.

use std::borrow::Cow;

use serde_yaml::{Mapping, Value};

use super::schema::{collapse, CommandSpec, OptionValue, SELF_ALIAS};
use crate::error::{Error, Result};

/// Keys with a fixed meaning inside a command body.
const NAME_KEY: &str = "name";
const ALIAS_KEY: &str = "alias";
const ARGUMENT_KEYS: [&str; 2] = ["args", "arguments"];
const OPTION_KEYS: [&str; 2] = ["opts", "options"];

/// How a key in a command body reads.
enum Key<'a> {
    /// An integer-like key: an anonymous list entry.
    Numeric,
    /// A named key.
    Named(Cow<'a, str>),
}

impl<'a> Key<'a> {
    fn classify(key: &'a Value) -> Self {
        match key {
            Value::Number(_) => Self::Numeric,
            Value::String(s) if is_numeric(s) => Self::Numeric,
            Value::String(s) => Self::Named(Cow::Borrowed(s)),
            other => Self::Named(Cow::Owned(collapse(other))),
        }
    }
}

/// Whether a string reads as a decimal number: an optional sign, digits
/// with at most one decimal point, and an optional exponent.
///
/// Words such as `inf` or `nan` are names, not numbers.
fn is_numeric(s: &str) -> bool {
    let s = s.trim();
    let s = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    let (mantissa, exponent) = match s.find(&['e', 'E'][..]) {
        Some(at) => (&s[..at], Some(&s[at + 1..])),
        None => (s, None),
    };

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return false;
    }

    match exponent {
        None => true,
        Some(exponent) => {
            let digits = exponent.strip_prefix(&['+', '-'][..]).unwrap_or(exponent);
            !digits.is_empty() && all_digits(digits)
        }
    }
}

/// Returns the option name if `token` is written as an option.
///
/// `-y` is special-cased to `yes`.
///
/// # Examples
///
/// ```
/// use siteenv::environment::command::option_name;
///
/// assert_eq!(option_name("--verbose"), Some("verbose"));
/// assert_eq!(option_name("-y"), Some("yes"));
/// assert_eq!(option_name("all"), None);
/// ```
#[must_use]
pub fn option_name(token: &str) -> Option<&str> {
    if token == "-y" {
        return Some("yes");
    }
    token.strip_prefix("--")
}

/// Accumulates one command while its entries are classified.
struct CommandBuilder {
    command: CommandSpec,
}

impl CommandBuilder {
    fn new(name: String) -> Self {
        Self {
            command: CommandSpec::new(name),
        }
    }

    fn argument(&mut self, value: &Value) {
        match value {
            Value::Null => {}
            other => self.command.arguments.push(collapse(other)),
        }
    }

    fn option(&mut self, name: &str, value: OptionValue) {
        let name = name.strip_prefix("--").unwrap_or(name);
        if name == "y" {
            self.command.options.insert("yes", value);
        } else {
            self.command.options.insert(name, value);
        }
    }

    /// A bare token from a list: alias, flag or positional argument.
    fn token(&mut self, token: &str) {
        if matches!(token, "-y" | "y" | "yes") {
            self.option("yes", OptionValue::Flag);
        } else if token.starts_with('@') {
            self.command.alias = token.to_string();
        } else if let Some(option) = option_name(token) {
            self.flag_token(option);
        } else {
            self.command.arguments.push(token.to_string());
        }
    }

    /// A flag written as `name` or `name=value`.
    fn flag_token(&mut self, token: &str) {
        match token.split_once('=') {
            Some((name, value)) => self.option(name, OptionValue::Value(value.to_string())),
            None => self.option(token, OptionValue::Flag),
        }
    }

    /// Every pair of a mapping becomes an option.
    fn option_pairs(&mut self, pairs: &Mapping) {
        for (key, value) in pairs {
            self.option(&collapse(key), OptionValue::from_value(value));
        }
    }

    fn arguments_section(&mut self, values: &Value) {
        match values {
            Value::Sequence(items) => items.iter().for_each(|item| self.argument(item)),
            other => self.argument(other),
        }
    }

    fn options_section(&mut self, values: &Value) -> Result<()> {
        match values {
            Value::Null => {}
            Value::Mapping(pairs) => {
                for (key, value) in pairs {
                    match Key::classify(key) {
                        Key::Named(name) => self.option(&name, OptionValue::from_value(value)),
                        Key::Numeric => self.option_item(value)?,
                    }
                }
            }
            Value::Sequence(items) => {
                for item in items {
                    self.option_item(item)?;
                }
            }
            other => self.option_item(other)?,
        }
        Ok(())
    }

    /// An anonymous entry of an options list.
    fn option_item(&mut self, item: &Value) -> Result<()> {
        match item {
            Value::Mapping(pairs) => self.option_pairs(pairs),
            Value::String(s) if matches!(s.as_str(), "-y" | "y" | "yes") => {
                self.option("yes", OptionValue::Flag);
            }
            Value::String(s) => self.flag_token(s.strip_prefix("--").unwrap_or(s)),
            Value::Null => {}
            Value::Sequence(_) | Value::Tagged(_) => {
                return Err(self.invalid("options", "nested lists are not supported"));
            }
            other => self.flag_token(&collapse(other)),
        }
        Ok(())
    }

    /// An anonymous entry of the command body itself.
    fn positional(&mut self, value: &Value) {
        match value {
            Value::String(token) => self.token(token),
            Value::Mapping(pairs) => self.option_pairs(pairs),
            other => self.argument(other),
        }
    }

    /// A named entry of the command body that is not a reserved key.
    fn named(&mut self, key: &str, value: &Value) {
        if let Some(option) = option_name(key) {
            self.option(option, OptionValue::from_value(value));
        } else {
            self.argument(value);
        }
    }

    fn invalid(&self, field: &str, message: &str) -> Error {
        Error::Validation {
            field: format!("commands.{}.{field}", self.command.name),
            message: message.to_string(),
        }
    }

    fn finish(self) -> CommandSpec {
        self.command
    }
}

/// Resolves the command name from its YAML key and body.
fn command_name(key: &Value, body: &Value) -> Result<String> {
    match Key::classify(key) {
        Key::Named(name) => Ok(name.into_owned()),
        Key::Numeric => match body.get(NAME_KEY) {
            Some(Value::String(name)) if !name.trim().is_empty() => Ok(name.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(Error::Validation {
                field: format!("commands.{}", collapse(key)),
                message: "anonymous command entries need a 'name'".to_string(),
            }),
        },
    }
}

/// Normalizes one command entry.
///
/// `key` is the YAML key of the entry (the command name, or a list index
/// for anonymous entries) and `body` is its value in any of the three
/// shorthand shapes.
///
/// # Errors
///
/// Returns a validation error when an anonymous entry has no name or an
/// options list nests lists.
///
/// # Examples
///
/// ```
/// use siteenv::environment::command::normalize_command;
/// use serde_yaml::Value;
///
/// let body: Value = serde_yaml::from_str(r#"["@dev", "-y", "all"]"#).unwrap();
/// let cmd = normalize_command(&Value::from("cache-clear"), &body).unwrap();
///
/// assert_eq!(cmd.name, "cache-clear");
/// assert_eq!(cmd.alias, "@dev");
/// assert_eq!(cmd.arguments, vec!["all".to_string()]);
/// assert!(cmd.is_confirmed());
/// ```
pub fn normalize_command(key: &Value, body: &Value) -> Result<CommandSpec> {
    let mut builder = CommandBuilder::new(command_name(key, body)?);

    match body {
        Value::Null => {}
        Value::Sequence(items) => items.iter().for_each(|item| builder.positional(item)),
        Value::Mapping(entries) => {
            for (entry_key, value) in entries {
                match Key::classify(entry_key) {
                    Key::Numeric => builder.positional(value),
                    Key::Named(name) => match name.as_ref() {
                        NAME_KEY => {}
                        ALIAS_KEY => {
                            builder.command.alias = match value {
                                Value::Null => SELF_ALIAS.to_string(),
                                other => collapse(other),
                            };
                        }
                        n if ARGUMENT_KEYS.contains(&n) => builder.arguments_section(value),
                        n if OPTION_KEYS.contains(&n) => builder.options_section(value)?,
                        n => builder.named(n, value),
                    },
                }
            }
        }
        scalar => builder.positional(scalar),
    }

    Ok(builder.finish())
}

/// Normalizes a whole `commands` section.
///
/// The section may be a mapping keyed by command name (numeric keys mark
/// anonymous entries) or a list of anonymous entries.
///
/// # Errors
///
/// Returns the first entry that fails to normalize, or a validation error
/// when the section is not a mapping or list.
pub fn normalize_commands(section: &Value) -> Result<Vec<CommandSpec>> {
    match section {
        Value::Null => Ok(Vec::new()),
        Value::Mapping(entries) => entries
            .iter()
            .map(|(key, body)| normalize_command(key, body))
            .collect(),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(index, body)| normalize_command(&Value::from(index), body))
            .collect(),
        _ => Err(Error::Validation {
            field: "commands".to_string(),
            message: "expected a mapping or a list of commands".to_string(),
        }),
    }
}
