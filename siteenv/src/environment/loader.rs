//! Environment file discovery and loading.
//!
//! Search roots are scanned recursively for environment files:
//!
//! - `<name>.env.drushrc.yml` holds a single environment called `<name>`.
//! - `env.drushrc.yml` is a group file whose top-level keys are
//!   environment names.
//!
//! Either extension (`.yml` or `.yaml`) is accepted. Roots are given from
//! lowest to highest priority; a later root's definition of a name replaces
//! an earlier one.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use walkdir::WalkDir;

use super::command::normalize_commands;
use super::schema::{collapse, Definition, Environment, Grant, ModuleStatus, OrderedMap};
use crate::error::{Error, Result};

/// Marker every environment file name carries before its extension.
pub const ENV_FILE_MARKER: &str = "env.drushrc";

/// Accepted file extensions.
const EXTENSIONS: [&str; 2] = [".yml", ".yaml"];

/// What kind of environment file a file name denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFileKind {
    /// A file holding one environment with the given name.
    Single(String),
    /// A file whose top-level keys are environment names.
    Group,
}

impl EnvFileKind {
    /// Classifies a file name.
    ///
    /// # Examples
    ///
    /// ```
    /// use siteenv::environment::EnvFileKind;
    ///
    /// assert_eq!(
    ///     EnvFileKind::from_file_name("dev.env.drushrc.yml"),
    ///     Some(EnvFileKind::Single("dev".into()))
    /// );
    /// assert_eq!(EnvFileKind::from_file_name("env.drushrc.yaml"), Some(EnvFileKind::Group));
    /// assert_eq!(EnvFileKind::from_file_name("dev.drushrc.php"), None);
    /// ```
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let stem = EXTENSIONS
            .iter()
            .find_map(|ext| file_name.strip_suffix(ext))?;

        if stem == ENV_FILE_MARKER {
            return Some(Self::Group);
        }

        let prefix = stem.strip_suffix(ENV_FILE_MARKER)?.strip_suffix('.')?;
        let name = prefix.split('.').next().unwrap_or_default();
        if name.is_empty() {
            None
        } else {
            Some(Self::Single(name.to_string()))
        }
    }
}

/// Options that control how environment files are loaded.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Site root; sources under it are recorded relative to it.
    pub site_root: Option<PathBuf>,
    /// Abort on the first file that fails to load instead of skipping it.
    pub strict: bool,
}

/// The top-level shape of one environment document.
#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(default)]
    modules: Option<Mapping>,
    #[serde(default)]
    variables: Option<Mapping>,
    #[serde(default)]
    permissions: Option<Mapping>,
    #[serde(default)]
    commands: Value,
    #[serde(flatten)]
    other: BTreeMap<String, Value>,
}

/// All environment definitions found in the search roots.
///
/// The catalog is built once and then only read.
#[derive(Debug, Default)]
pub struct Catalog {
    environments: BTreeMap<String, Environment>,
    failures: Vec<Error>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans `roots` (lowest priority first) and loads every environment file.
    ///
    /// Files that fail to load are skipped and recorded in
    /// [`Catalog::failures`], unless `options.strict` is set.
    ///
    /// # Errors
    ///
    /// In strict mode, returns the first file that fails to load.
    pub fn load(roots: &[PathBuf], options: &LoadOptions) -> Result<Self> {
        let mut catalog = Self::new();

        for root in roots {
            if !root.is_dir() {
                log::debug!("Skipping missing search path {}", root.display());
                continue;
            }

            log::debug!("Scanning {}", root.display());
            for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        log::warn!("Unable to scan {}: {e}", root.display());
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }

                match load_file(entry.path(), options) {
                    Ok(environments) => {
                        for environment in environments {
                            catalog.insert(environment);
                        }
                    }
                    Err(e) if options.strict => return Err(e),
                    Err(e) => {
                        log::warn!("{e}");
                        catalog.failures.push(e);
                    }
                }
            }
        }

        Ok(catalog)
    }

    /// Registers an environment, replacing any previous one of the same name.
    pub fn insert(&mut self, environment: Environment) {
        if let Some(previous) = self.environments.get(&environment.name) {
            log::debug!(
                "Environment '{}' from {} overrides {}",
                environment.name,
                environment.source.display(),
                previous.source.display()
            );
        }
        self.environments
            .insert(environment.name.clone(), environment);
    }

    /// Looks up an environment by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Environment> {
        self.environments.get(name)
    }

    /// Whether an environment is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.environments.contains_key(name)
    }

    /// Environment names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.environments.keys().map(String::as_str)
    }

    /// All environments in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Environment> {
        self.environments.values()
    }

    /// Number of environments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.environments.len()
    }

    /// Whether no environment was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    /// Files that were skipped because they failed to load.
    #[must_use]
    pub fn failures(&self) -> &[Error] {
        &self.failures
    }
}

/// Loads the environments defined by one file.
///
/// Files whose names do not follow the environment file convention yield
/// nothing.
///
/// # Errors
///
/// Returns [`Error::Load`] when the file cannot be read, is not valid YAML,
/// or does not have the expected structure.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Vec<Environment>> {
    let Some(kind) = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(EnvFileKind::from_file_name)
    else {
        return Ok(Vec::new());
    };

    let load_error = |message: String| Error::Load {
        path: path.to_path_buf(),
        message,
    };

    let contents =
        fs::read_to_string(path).map_err(|e| load_error(format!("unable to read file: {e}")))?;
    let document: Value =
        serde_yaml::from_str(&contents).map_err(|e| load_error(format!("invalid YAML: {e}")))?;
    let source = source_path(path, options.site_root.as_deref());

    let documents = match kind {
        EnvFileKind::Single(name) => vec![(name, document)],
        EnvFileKind::Group => match document {
            Value::Null => Vec::new(),
            Value::Mapping(entries) => entries
                .into_iter()
                .map(|(name, document)| (collapse(&name), document))
                .collect(),
            _ => return Err(load_error("group file must be a mapping of environments".into())),
        },
    };

    documents
        .into_iter()
        .map(|(name, document)| {
            let definition =
                parse_definition(document).map_err(|e| load_error(format!("{name}: {e}")))?;
            log::debug!("Loaded environment '{name}' from {}", path.display());
            Ok(Environment {
                name,
                definition,
                source: source.clone(),
            })
        })
        .collect()
}

/// Parses and normalizes one environment document.
///
/// # Errors
///
/// Returns a validation error when a section has the wrong shape.
///
/// # Examples
///
/// ```
/// use siteenv::environment::loader::parse_definition;
///
/// let doc = serde_yaml::from_str("modules:\n  enable: [devel]\n").unwrap();
/// let def = parse_definition(doc).unwrap();
/// assert_eq!(def.modules.enabled(), &["devel".to_string()]);
/// assert!(def.variables.is_empty());
/// ```
pub fn parse_definition(document: Value) -> Result<Definition> {
    let raw: RawDocument = match document {
        Value::Null => RawDocument::default(),
        Value::Mapping(_) => serde_yaml::from_value(document)?,
        _ => {
            return Err(Error::Validation {
                field: "environment".into(),
                message: "expected a mapping of sections".into(),
            })
        }
    };

    let mut definition = Definition {
        commands: normalize_commands(&raw.commands)?,
        unknown_sections: raw.other.into_keys().collect(),
        ..Definition::default()
    };

    parse_modules(&mut definition, raw.modules.unwrap_or_default())?;

    definition.variables = raw
        .variables
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| (collapse(&name), value))
        .collect();

    for (role, permissions) in raw.permissions.unwrap_or_default() {
        let role = collapse(&role);
        let grants: OrderedMap<Grant> = match permissions {
            Value::Null => OrderedMap::new(),
            Value::Mapping(entries) => entries
                .iter()
                .map(|(permission, grant)| (collapse(permission), Grant::from_value(grant)))
                .collect(),
            _ => {
                return Err(Error::Validation {
                    field: format!("permissions.{role}"),
                    message: "expected a mapping of permission to grant/revoke".into(),
                })
            }
        };
        definition.permissions.insert(role, grants);
    }

    Ok(definition)
}

fn parse_modules(definition: &mut Definition, modules: Mapping) -> Result<()> {
    for (status_key, names) in modules {
        let status = ModuleStatus::from_key(&status_key).ok_or_else(|| Error::Validation {
            field: "modules".into(),
            message: format!("unknown module status '{}'", collapse(&status_key)),
        })?;

        let names: Vec<String> = match names {
            Value::Null => Vec::new(),
            Value::Sequence(items) => items.iter().map(collapse).collect(),
            Value::Mapping(entries) => entries.values().map(collapse).collect(),
            scalar => collapse(&scalar)
                .split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        };

        for name in names {
            match definition.modules.status_of(&name) {
                Some(existing) if existing != status => {
                    return Err(Error::Validation {
                        field: "modules".into(),
                        message: format!("module '{name}' is listed as both {existing} and {status}"),
                    });
                }
                _ => definition.modules.set(name, status),
            }
        }
    }
    Ok(())
}

/// Records a source path relative to the site root when it lives there.
fn source_path(path: &Path, site_root: Option<&Path>) -> PathBuf {
    site_root
        .and_then(|root| path.strip_prefix(root).ok())
        .map_or_else(|| path.to_path_buf(), Path::to_path_buf)
}
