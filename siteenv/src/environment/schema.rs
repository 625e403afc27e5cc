//! Environment definition schema.
//!
//! These are the canonical, already-normalized shapes of an environment
//! definition. Raw YAML only exists inside the loader and the command
//! normalizer; everything downstream works with the types in this module.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use serde_yaml::Value;

use crate::error::Error;

/// Alias a command runs against when none is given.
pub const SELF_ALIAS: &str = "@self";

/// Variable value that marks the variable for deletion.
pub const DELETE_SENTINEL: &str = "[DELETE]";

/// An insertion-ordered map keyed by strings.
///
/// Re-inserting an existing key replaces the value in place, so the key
/// keeps its original position.
///
/// # Examples
///
/// ```
/// use siteenv::environment::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.insert("b", 1);
/// map.insert("a", 2);
/// map.insert("b", 3);
///
/// let keys: Vec<_> = map.keys().collect();
/// assert_eq!(keys, vec!["b", "a"]);
/// assert_eq!(map.get("b"), Some(&3));
/// ```
#[derive(Debug, Clone)]
pub struct OrderedMap<V> {
    entries: IndexMap<String, V>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

// Two maps are equal only when their entries match in order.
impl<V: PartialEq> PartialEq for OrderedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl<V: Eq> Eq for OrderedMap<V> {}

impl<V> OrderedMap<V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(key.into(), value)
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Returns the value for `key`, inserting the result of `make` first
    /// when the key is absent.
    pub fn entry_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> V) -> &mut V {
        self.entries.entry(key.to_string()).or_insert_with(make)
    }

    /// Whether the map contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes `key`, returning its value. Later keys keep their order.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.shift_remove(key)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Desired state of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleStatus {
    /// The module should be enabled.
    Enable,
    /// The module should be disabled.
    Disable,
}

impl ModuleStatus {
    /// Parses a status keyword: `enable`/`1`/`true` or `disable`/`0`/`false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use siteenv::environment::ModuleStatus;
    /// use serde_yaml::Value;
    ///
    /// assert_eq!(ModuleStatus::from_key(&Value::from("Enable")), Some(ModuleStatus::Enable));
    /// assert_eq!(ModuleStatus::from_key(&Value::from(0)), Some(ModuleStatus::Disable));
    /// assert_eq!(ModuleStatus::from_key(&Value::from("maybe")), None);
    /// ```
    #[must_use]
    pub fn from_key(key: &Value) -> Option<Self> {
        match key {
            Value::Bool(true) => Some(Self::Enable),
            Value::Bool(false) => Some(Self::Disable),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Some(Self::Enable),
                Some(0) => Some(Self::Disable),
                _ => None,
            },
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "enable" | "1" | "true" => Some(Self::Enable),
                "disable" | "0" | "false" => Some(Self::Disable),
                _ => None,
            },
            _ => None,
        }
    }

    /// The keyword used in summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
        }
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Desired module states, kept as two de-duplicated ordered sets.
///
/// A module lives in at most one of the sets. Setting a module to the other
/// status moves it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSpec {
    enable: Vec<String>,
    disable: Vec<String>,
}

impl ModuleSpec {
    /// Records the desired status for a module.
    pub fn set(&mut self, module: impl Into<String>, status: ModuleStatus) {
        let module = module.into();
        let (target, other) = match status {
            ModuleStatus::Enable => (&mut self.enable, &mut self.disable),
            ModuleStatus::Disable => (&mut self.disable, &mut self.enable),
        };
        other.retain(|m| *m != module);
        if !target.contains(&module) {
            target.push(module);
        }
    }

    /// Desired status of `module`, if it is mentioned.
    #[must_use]
    pub fn status_of(&self, module: &str) -> Option<ModuleStatus> {
        if self.enable.iter().any(|m| m == module) {
            Some(ModuleStatus::Enable)
        } else if self.disable.iter().any(|m| m == module) {
            Some(ModuleStatus::Disable)
        } else {
            None
        }
    }

    /// Modules that should be enabled, in declaration order.
    #[must_use]
    pub fn enabled(&self) -> &[String] {
        &self.enable
    }

    /// Modules that should be disabled, in declaration order.
    #[must_use]
    pub fn disabled(&self) -> &[String] {
        &self.disable
    }

    /// Non-empty status groups in execution order.
    pub fn groups(&self) -> impl Iterator<Item = (ModuleStatus, &[String])> {
        [
            (ModuleStatus::Enable, self.enable.as_slice()),
            (ModuleStatus::Disable, self.disable.as_slice()),
        ]
        .into_iter()
        .filter(|(_, modules)| !modules.is_empty())
    }

    /// Whether no module is mentioned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enable.is_empty() && self.disable.is_empty()
    }
}

/// Whether a permission is granted or revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// Grant the permission to the role.
    Grant,
    /// Revoke the permission from the role.
    Revoke,
}

impl Grant {
    /// Reads a grant indicator. `1`, `true` and `grant` grant; anything
    /// else revokes.
    ///
    /// # Examples
    ///
    /// ```
    /// use siteenv::environment::Grant;
    /// use serde_yaml::Value;
    ///
    /// assert_eq!(Grant::from_value(&Value::from(1)), Grant::Grant);
    /// assert_eq!(Grant::from_value(&Value::from("GRANT")), Grant::Grant);
    /// assert_eq!(Grant::from_value(&Value::from("nope")), Grant::Revoke);
    /// ```
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let granted = match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_i64() == Some(1),
            Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "grant" | "1"),
            _ => false,
        };
        if granted {
            Self::Grant
        } else {
            Self::Revoke
        }
    }

    /// Label used in summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Grant => "grant",
            Self::Revoke => "revoke",
        }
    }
}

/// Value of a command option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// A bare flag, rendered as `--name`.
    Flag,
    /// A valued option, rendered as `--name=value`.
    Value(String),
}

impl OptionValue {
    /// Normalizes a YAML option value.
    ///
    /// `true`, `1` and null become a bare flag, `false` becomes `0`, and
    /// sequences collapse to comma-joined strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use siteenv::environment::OptionValue;
    /// use serde_yaml::Value;
    ///
    /// assert_eq!(OptionValue::from_value(&Value::from(true)), OptionValue::Flag);
    /// assert_eq!(OptionValue::from_value(&Value::from(0)), OptionValue::Value("0".into()));
    /// ```
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null | Value::Bool(true) => Self::Flag,
            Value::Bool(false) => Self::Value("0".to_string()),
            Value::Number(n) if n.as_i64() == Some(1) => Self::Flag,
            other => Self::Value(collapse(other)),
        }
    }
}

/// Collapses a YAML value into a single command-line token.
///
/// Sequences (and mapping values) are comma-joined, recursively.
#[must_use]
pub fn collapse(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => items.iter().map(collapse).collect::<Vec<_>>().join(","),
        Value::Mapping(map) => map.values().map(collapse).collect::<Vec<_>>().join(","),
        Value::Tagged(tagged) => collapse(&tagged.value),
    }
}

/// A normalized follow-on command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Command name as the host tool knows it.
    pub name: String,
    /// Target alias, `@self` by default.
    pub alias: String,
    /// Positional arguments in declaration order.
    pub arguments: Vec<String>,
    /// Options in declaration order.
    pub options: OrderedMap<OptionValue>,
}

impl CommandSpec {
    /// Creates a command with no arguments against `@self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use siteenv::environment::CommandSpec;
    ///
    /// let cmd = CommandSpec::new("cache-clear")
    ///     .with_argument("all")
    ///     .with_flag("yes");
    /// assert_eq!(cmd.alias, "@self");
    /// assert!(cmd.is_confirmed());
    /// ```
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: SELF_ALIAS.to_string(),
            arguments: Vec::new(),
            options: OrderedMap::new(),
        }
    }

    /// Sets the alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// Adds a bare flag option.
    #[must_use]
    pub fn with_flag(mut self, name: impl Into<String>) -> Self {
        self.options.insert(name, OptionValue::Flag);
        self
    }

    /// Adds a valued option.
    #[must_use]
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name, OptionValue::Value(value.into()));
        self
    }

    /// Whether the command carries the `yes` confirmation flag.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.options.contains_key("yes")
    }
}

/// One of the four sections of a definition, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    /// Module enable/disable state.
    Modules,
    /// Configuration variables.
    Variables,
    /// Role permissions.
    Permissions,
    /// Follow-on commands.
    Commands,
}

impl Group {
    /// All groups in execution order.
    pub const ALL: [Self; 4] = [
        Self::Modules,
        Self::Variables,
        Self::Permissions,
        Self::Commands,
    ];

    /// The section name used in YAML and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Modules => "modules",
            Self::Variables => "variables",
            Self::Permissions => "permissions",
            Self::Commands => "commands",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Group {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "modules" => Ok(Self::Modules),
            "variables" => Ok(Self::Variables),
            "permissions" => Ok(Self::Permissions),
            "commands" => Ok(Self::Commands),
            _ => Err(Error::InvalidGroup {
                name: s.trim().to_string(),
            }),
        }
    }
}

/// A normalized environment definition.
///
/// The same shape is used for the merged execution plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definition {
    /// Desired module states.
    pub modules: ModuleSpec,
    /// Variables to set or delete.
    pub variables: OrderedMap<Value>,
    /// Role name to permission grants.
    pub permissions: OrderedMap<OrderedMap<Grant>>,
    /// Follow-on commands in execution order.
    pub commands: Vec<CommandSpec>,
    /// Top-level sections that are not one of the four known groups.
    pub unknown_sections: Vec<String>,
}

/// The merged definition for a request.
pub type ExecutionPlan = Definition;

impl Definition {
    /// Whether the given group has nothing to apply.
    #[must_use]
    pub fn is_group_empty(&self, group: Group) -> bool {
        match group {
            Group::Modules => self.modules.is_empty(),
            Group::Variables => self.variables.is_empty(),
            Group::Permissions => self.permissions.is_empty(),
            Group::Commands => self.commands.is_empty(),
        }
    }

    /// Whether every group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Group::ALL.iter().all(|g| self.is_group_empty(*g))
    }
}

/// A named definition together with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    /// Environment name.
    pub name: String,
    /// The normalized definition.
    pub definition: Definition,
    /// Source file, relative to the site root when possible.
    pub source: PathBuf,
}
