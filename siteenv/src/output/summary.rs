//! Dry-run summary of a resolved plan.

use serde_yaml::Value;

use super::format::{capitalize_words, format_heading, key_value_lines, CommandFormatter};
use super::report::Reporter;
use crate::environment::{ExecutionPlan, Group, Resolution};

/// Prints what applying `resolution` would do, group by group.
///
/// # Examples
///
/// ```
/// use siteenv::environment::{Resolution, ModuleStatus};
/// use siteenv::output::{print_summary, CommandFormatter, RecordingReporter};
///
/// let mut resolution = Resolution::default();
/// resolution.loaded.push(("dev".into(), "drush/dev.env.drushrc.yml".into()));
/// resolution.plan.modules.set("devel", ModuleStatus::Enable);
///
/// let mut reporter = RecordingReporter::default();
/// print_summary(&resolution, &CommandFormatter::default(), &mut reporter);
///
/// assert!(reporter.lines().contains(&"drush/dev.env.drushrc.yml"));
/// assert!(reporter.lines().contains(&"Enable : devel"));
/// ```
pub fn print_summary(
    resolution: &Resolution,
    formatter: &CommandFormatter,
    reporter: &mut dyn Reporter,
) {
    reporter.blank();
    reporter.line(&format_heading("Environment Definitions Found", ":"));
    for (_, source) in &resolution.loaded {
        reporter.print(1, &source.display().to_string());
    }

    reporter.blank();
    reporter.line(&format_heading("CONFIGURATION SUMMARY", ":"));

    let plan = &resolution.plan;
    for group in Group::ALL {
        if plan.is_group_empty(group) {
            continue;
        }
        reporter.line(&format_heading(group.as_str(), ":"));
        match group {
            Group::Modules => print_modules(plan, reporter),
            Group::Variables => print_variables(plan, reporter),
            Group::Permissions => print_permissions(plan, reporter),
            Group::Commands => print_commands(plan, formatter, reporter),
        }
    }

    for section in &plan.unknown_sections {
        reporter.line(&format_heading(section, ":"));
        reporter.warn(&format!("I'm not sure what to do with '{section}'."));
    }
}

fn print_modules(plan: &ExecutionPlan, reporter: &mut dyn Reporter) {
    let rows = plan
        .modules
        .groups()
        .map(|(status, modules)| (capitalize_words(status.as_str()), modules.join(", ")));
    print_rows(reporter, 1, key_value_lines(rows));
}

fn print_variables(plan: &ExecutionPlan, reporter: &mut dyn Reporter) {
    let rows = plan
        .variables
        .iter()
        .map(|(name, value)| (name, inline_value(value)));
    print_rows(reporter, 1, key_value_lines(rows));
}

fn print_permissions(plan: &ExecutionPlan, reporter: &mut dyn Reporter) {
    for (role, grants) in plan.permissions.iter() {
        reporter.print(1, role);
        let rows = grants
            .iter()
            .map(|(permission, grant)| (permission, grant.label()));
        print_rows(reporter, 2, key_value_lines(rows));
    }
}

fn print_commands(
    plan: &ExecutionPlan,
    formatter: &CommandFormatter,
    reporter: &mut dyn Reporter,
) {
    for command in &plan.commands {
        reporter.print(1, &formatter.render(command));
    }
    reporter.blank();
}

fn print_rows(reporter: &mut dyn Reporter, indent: usize, rows: Vec<String>) {
    for row in rows {
        reporter.print(indent, &row);
    }
}

/// Renders a value on one line, using flow syntax for collections.
///
/// # Examples
///
/// ```
/// use siteenv::output::inline_value;
///
/// let value: serde_yaml::Value = serde_yaml::from_str("{a: [1, 2], b: on}").unwrap();
/// assert_eq!(inline_value(&value), "{a: [1, 2], b: on}");
/// ```
#[must_use]
pub fn inline_value(value: &Value) -> String {
    match value {
        Value::Null => "~".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => format!(
            "[{}]",
            items.iter().map(inline_value).collect::<Vec<_>>().join(", ")
        ),
        Value::Mapping(map) => format!(
            "{{{}}}",
            map.iter()
                .map(|(k, v)| format!("{}: {}", inline_value(k), inline_value(v)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Value::Tagged(tagged) => format!("{} {}", tagged.tag, inline_value(&tagged.value)),
    }
}
