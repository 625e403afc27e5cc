//! Plan execution engine.
//!
//! The executor walks the groups of a resolved plan in a fixed order and
//! brings the site into the described state. Declarative problems (an
//! unknown role, a failed variable write) are recorded and processing
//! continues; a failing follow-on command stops the run.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde_yaml::Value;

use super::site::Site;
use crate::environment::{
    CommandSpec, ExecutionPlan, Grant, Group, ModuleStatus, OptionValue, Resolution,
    DELETE_SENTINEL,
};
use crate::error::{Error, Result};
use crate::output::{format_heading, CommandFormatter, Reporter};
use crate::settings::DEFAULT_TOOL;

/// Option carrying the configuration file passed to every command.
const CONFIG_OPTION: &str = "config";

/// Which groups of a plan to apply.
///
/// # Examples
///
/// ```
/// use siteenv::environment::Group;
/// use siteenv::operations::GroupSelection;
///
/// let selection = GroupSelection::parse("modules, commands,blocks");
/// assert!(selection.includes(Group::Modules));
/// assert!(!selection.includes(Group::Variables));
/// assert_eq!(selection.invalid(), &["blocks".to_string()]);
///
/// assert!(GroupSelection::parse("").includes(Group::Variables));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSelection {
    groups: Option<BTreeSet<Group>>,
    invalid: Vec<String>,
}

impl GroupSelection {
    /// Selects every group.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Parses a comma-separated list of group names.
    ///
    /// An empty list selects every group. Names that are not groups are
    /// kept and reported when the plan is applied.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        let names: Vec<&str> = list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();
        if names.is_empty() {
            return Self::all();
        }

        let mut groups = BTreeSet::new();
        let mut invalid = Vec::new();
        for name in names {
            match name.parse::<Group>() {
                Ok(group) => {
                    groups.insert(group);
                }
                Err(_) => invalid.push(name.to_string()),
            }
        }
        Self {
            groups: Some(groups),
            invalid,
        }
    }

    /// Whether every group is selected.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.groups.is_none()
    }

    /// Whether `group` is selected.
    #[must_use]
    pub fn includes(&self, group: Group) -> bool {
        self.groups.as_ref().map_or(true, |groups| groups.contains(&group))
    }

    /// Requested names that are not groups.
    #[must_use]
    pub fn invalid(&self) -> &[String] {
        &self.invalid
    }
}

/// Options for an apply run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorOptions {
    /// Tool binary shown in rendered commands.
    pub tool: String,
    /// Configuration file passed to every command as `--config`.
    pub config_file: Option<PathBuf>,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            tool: DEFAULT_TOOL.to_string(),
            config_file: None,
        }
    }
}

impl ExecutorOptions {
    /// Creates options for the given tool.
    #[must_use]
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            config_file: None,
        }
    }

    /// Sets the configuration file passed to commands.
    #[must_use]
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }
}

/// Outcome of an apply run that was not stopped by a command failure.
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Problems that were recorded while processing continued.
    pub errors: Vec<Error>,
    /// Groups that were applied, in order.
    pub groups: Vec<Group>,
}

impl ApplyReport {
    /// Whether the run finished without recorded problems.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Applies resolved plans to a site.
///
/// # Examples
///
/// ```
/// use siteenv::environment::{Resolution, ModuleStatus};
/// use siteenv::operations::{Executor, ExecutorOptions, GroupSelection, Site};
/// use siteenv::output::RecordingReporter;
/// use siteenv::Result;
/// use serde_yaml::Value;
///
/// #[derive(Default)]
/// struct Noop;
///
/// impl Site for Noop {
///     fn module_enabled(&mut self, _: &str) -> Result<bool> { Ok(false) }
///     fn enable_modules(&mut self, _: &[String]) -> Result<()> { Ok(()) }
///     fn disable_modules(&mut self, _: &[String]) -> Result<()> { Ok(()) }
///     fn set_variable(&mut self, _: &str, _: &Value) -> Result<()> { Ok(()) }
///     fn delete_variable(&mut self, _: &str) -> Result<()> { Ok(()) }
///     fn role_id(&mut self, _: &str) -> Result<Option<String>> { Ok(None) }
///     fn grant_permissions(&mut self, _: &str, _: &[String]) -> Result<()> { Ok(()) }
///     fn revoke_permissions(&mut self, _: &str, _: &[String]) -> Result<()> { Ok(()) }
///     fn invoke(&mut self, _: &siteenv::environment::CommandSpec) -> Result<()> { Ok(()) }
/// }
///
/// let mut resolution = Resolution::default();
/// resolution.loaded.push(("dev".into(), "dev.env.drushrc.yml".into()));
/// resolution.plan.modules.set("devel", ModuleStatus::Enable);
///
/// let mut site = Noop;
/// let mut reporter = RecordingReporter::default();
/// let report = Executor::new(&mut site, &mut reporter, ExecutorOptions::default())
///     .apply(&resolution, &GroupSelection::all())
///     .unwrap();
/// assert!(report.is_success());
/// ```
pub struct Executor<'a> {
    site: &'a mut dyn Site,
    reporter: &'a mut dyn Reporter,
    options: ExecutorOptions,
    formatter: CommandFormatter,
}

impl<'a> Executor<'a> {
    /// Creates an executor.
    pub fn new(
        site: &'a mut dyn Site,
        reporter: &'a mut dyn Reporter,
        options: ExecutorOptions,
    ) -> Self {
        let formatter = CommandFormatter::new(options.tool.clone());
        Self {
            site,
            reporter,
            options,
            formatter,
        }
    }

    /// Applies the selected groups of a resolved plan.
    ///
    /// Groups run in the order modules, variables, permissions, commands.
    /// Empty groups and groups outside `selection` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandFailed`] as soon as a follow-on command fails.
    /// Commands that already ran are not undone.
    pub fn apply(
        &mut self,
        resolution: &Resolution,
        selection: &GroupSelection,
    ) -> Result<ApplyReport> {
        let mut report = ApplyReport::default();
        let plan = &resolution.plan;

        let names = resolution.names().collect::<Vec<_>>().join("+");
        self.reporter.blank();
        self.reporter.line(&format_heading(
            &format!("--- CONFIGURING {} ENVIRONMENT ---", names.to_uppercase()),
            "",
        ));

        for name in selection.invalid() {
            self.record(
                &mut report,
                Error::InvalidGroup { name: name.clone() },
            );
        }

        for group in Group::ALL {
            if plan.is_group_empty(group) || !selection.includes(group) {
                continue;
            }

            log::debug!("Applying group {group}");
            self.reporter.blank();
            self.reporter.line(&format_heading(group.as_str(), ":"));
            report.groups.push(group);

            match group {
                Group::Modules => self.apply_modules(plan, &mut report),
                Group::Variables => self.apply_variables(plan, &mut report),
                Group::Permissions => self.apply_permissions(plan, &mut report),
                Group::Commands => {
                    if let Err(e) = self.apply_commands(plan) {
                        self.finish(&report, true);
                        return Err(e);
                    }
                }
            }
        }

        if selection.is_all() {
            for section in &plan.unknown_sections {
                self.reporter
                    .error(&format!("I'm not sure what to do with '{section}'."));
                report.errors.push(Error::InvalidGroup {
                    name: section.clone(),
                });
            }
        }

        self.finish(&report, !report.is_success());
        Ok(report)
    }

    fn record(&mut self, report: &mut ApplyReport, error: Error) {
        self.reporter.error(&error.to_string());
        report.errors.push(error);
    }

    fn finish(&mut self, report: &ApplyReport, failed: bool) {
        self.reporter.blank();
        if failed {
            log::debug!("Apply finished with {} recorded error(s)", report.errors.len());
            self.reporter.error(
                "The environment may not have been configured the way you wanted. \
                 Check the logs for more details.",
            );
            self.reporter.line(
                "Use the --groups option to run only certain sections of an environment definition.",
            );
        } else {
            self.reporter.success("Environment setup complete!");
        }
    }

    fn apply_modules(&mut self, plan: &ExecutionPlan, report: &mut ApplyReport) {
        let mut enable = Vec::new();
        let mut disable = Vec::new();

        for (status, modules) in plan.modules.groups() {
            for module in modules {
                let enabled = match self.site.module_enabled(module) {
                    Ok(enabled) => enabled,
                    Err(e) => {
                        self.record(report, e);
                        continue;
                    }
                };
                match status {
                    ModuleStatus::Enable if !enabled => enable.push(module.clone()),
                    ModuleStatus::Disable if enabled => disable.push(module.clone()),
                    _ => {}
                }
            }
        }

        if !enable.is_empty() {
            match self.site.enable_modules(&enable) {
                Ok(()) => self.reporter.print(1, &format!("Enabled: {}", enable.join(", "))),
                Err(e) => self.record(report, e),
            }
        }

        if !disable.is_empty() {
            match self.site.disable_modules(&disable) {
                Ok(()) => self
                    .reporter
                    .print(1, &format!("Disabled: {}", disable.join(", "))),
                Err(e) => self.record(report, e),
            }
        }

        if enable.is_empty() && disable.is_empty() {
            self.reporter.line("All modules are in their desired state.");
        }
    }

    fn apply_variables(&mut self, plan: &ExecutionPlan, report: &mut ApplyReport) {
        for (name, value) in plan.variables.iter() {
            if value.as_str() == Some(DELETE_SENTINEL) {
                match self.site.delete_variable(name) {
                    Ok(()) => self.reporter.line(&format!("'{name}' was deleted.")),
                    Err(e) => self.record(report, e),
                }
                continue;
            }

            match self.site.set_variable(name, value) {
                Ok(()) => {
                    let message = match scalar_text(value) {
                        Some(text) => format!("'{name}' set to {text}."),
                        None => format!("'{name}' has been set."),
                    };
                    self.reporter.line(&message);
                }
                Err(e) => self.record(report, e),
            }
        }
    }

    fn apply_permissions(&mut self, plan: &ExecutionPlan, report: &mut ApplyReport) {
        for (role, grants) in plan.permissions.iter() {
            let role_id = match self.site.role_id(role) {
                Ok(Some(id)) => id,
                Ok(None) => {
                    self.record(report, Error::UnknownRole { role: role.to_string() });
                    continue;
                }
                Err(e) => {
                    self.record(report, e);
                    continue;
                }
            };

            let (granted, revoked): (Vec<_>, Vec<_>) =
                grants.iter().partition(|(_, grant)| **grant == Grant::Grant);
            let granted: Vec<String> = granted.into_iter().map(|(p, _)| p.to_string()).collect();
            let revoked: Vec<String> = revoked.into_iter().map(|(p, _)| p.to_string()).collect();

            if !granted.is_empty() {
                match self.site.grant_permissions(&role_id, &granted) {
                    Ok(()) => self.reporter.line(&format!(
                        "Granted to '{role}': {}",
                        granted.join(", ")
                    )),
                    Err(e) => self.record(report, e),
                }
            }

            if !revoked.is_empty() {
                match self.site.revoke_permissions(&role_id, &revoked) {
                    Ok(()) => self.reporter.line(&format!(
                        "Revoked from '{role}': {}",
                        revoked.join(", ")
                    )),
                    Err(e) => self.record(report, e),
                }
            }
        }
    }

    fn apply_commands(&mut self, plan: &ExecutionPlan) -> Result<()> {
        for command in &plan.commands {
            let command = self.with_default_options(command);
            self.reporter.line(&format!(
                "{} {}",
                format_heading("»", ""),
                self.formatter.render(&command)
            ));

            self.site
                .invoke(&command)
                .map_err(|e| Error::CommandFailed {
                    command: command.name.clone(),
                    reason: e.to_string(),
                })?;
            self.reporter.blank();
        }
        Ok(())
    }

    /// Adds `--config` unless the command already sets it.
    fn with_default_options(&self, command: &CommandSpec) -> CommandSpec {
        let mut command = command.clone();
        if let Some(config) = &self.options.config_file {
            if !command.options.contains_key(CONFIG_OPTION) {
                command.options.insert(
                    CONFIG_OPTION,
                    OptionValue::Value(config.display().to_string()),
                );
            }
        }
        command
    }
}

/// Display text for scalar values.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
