//! Resolution of a composite request such as `dev+debug` into one plan.

use std::path::PathBuf;

use super::loader::Catalog;
use super::merger::PlanMerger;
use super::schema::ExecutionPlan;
use crate::error::{Error, Result};
use crate::output::Reporter;

/// Separator between environment names in a request.
pub const COMPOSITE_SEPARATOR: char = '+';

/// Asks the user a yes/no question.
pub trait Confirm {
    /// Returns whether the user agreed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Prompt`] when the question cannot be asked.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Answers yes to every question.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        log::debug!("{prompt} (assumed yes)");
        Ok(true)
    }
}

/// Answers no to every question.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeNo;

impl Confirm for AssumeNo {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        log::debug!("{prompt} (assumed no)");
        Ok(false)
    }
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> Result<bool>,
{
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self(prompt)
    }
}

/// The merged plan for a request and where its parts came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// The combined definition.
    pub plan: ExecutionPlan,
    /// Names and source files of the environments that were merged, in order.
    pub loaded: Vec<(String, PathBuf)>,
}

impl Resolution {
    /// Names of the environments that were merged.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.loaded.iter().map(|(name, _)| name.as_str())
    }
}

/// Splits a request into environment names, dropping empty parts.
///
/// # Examples
///
/// ```
/// use siteenv::environment::split_request;
///
/// assert_eq!(split_request("dev+debug"), vec!["dev", "debug"]);
/// assert_eq!(split_request(" dev ++ "), vec!["dev"]);
/// ```
#[must_use]
pub fn split_request(requested: &str) -> Vec<&str> {
    requested
        .split(COMPOSITE_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Builds the execution plan for `requested`.
///
/// Names are merged left to right, so later environments win conflicts.
/// A missing environment is reported as a warning; if more names follow,
/// the user is asked whether to go on without it.
///
/// # Errors
///
/// - [`Error::UnknownEnvironment`] when the last requested name is missing
///   or the request names nothing
/// - [`Error::Aborted`] when the user declines to continue
/// - any error raised by `confirm`
///
/// # Examples
///
/// ```
/// use siteenv::environment::{resolve, AssumeYes, Catalog, Definition, Environment};
/// use siteenv::output::RecordingReporter;
///
/// let mut catalog = Catalog::new();
/// catalog.insert(Environment {
///     name: "dev".into(),
///     definition: Definition::default(),
///     source: "drush/dev.env.drushrc.yml".into(),
/// });
///
/// let mut reporter = RecordingReporter::default();
/// let resolution = resolve("ghost+dev", &catalog, &mut AssumeYes, &mut reporter).unwrap();
///
/// assert_eq!(resolution.names().collect::<Vec<_>>(), vec!["dev"]);
/// assert_eq!(reporter.warnings().len(), 1);
/// ```
pub fn resolve(
    requested: &str,
    catalog: &Catalog,
    confirm: &mut dyn Confirm,
    reporter: &mut dyn Reporter,
) -> Result<Resolution> {
    let names = split_request(requested);
    if names.is_empty() {
        return Err(Error::UnknownEnvironment {
            name: requested.to_string(),
        });
    }

    let mut resolution = Resolution::default();
    let last = names.len() - 1;

    for (index, name) in names.iter().enumerate() {
        match catalog.get(name) {
            Some(environment) => {
                log::debug!(
                    "Merging environment '{name}' from {}",
                    environment.source.display()
                );
                PlanMerger::merge_into(&mut resolution.plan, &environment.definition);
                if !resolution.names().any(|loaded| loaded == environment.name) {
                    resolution
                        .loaded
                        .push((environment.name.clone(), environment.source.clone()));
                }
            }
            None => {
                reporter.warn(&format!(
                    "Unable to locate an environment definition for '{name}'."
                ));
                if index == last {
                    return Err(Error::UnknownEnvironment {
                        name: (*name).to_string(),
                    });
                }
                if !confirm.confirm("Do you want to process the other environments?")? {
                    return Err(Error::Aborted);
                }
            }
        }
    }

    Ok(resolution)
}
