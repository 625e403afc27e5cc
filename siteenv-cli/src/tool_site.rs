//! A [`Site`] backed by the site-management tool.
//!
//! Every operation runs the tool as a child process in the site root.
//! Queries capture standard output; follow-on commands inherit it so their
//! progress reaches the user. When a site other than the default one is
//! selected, every call that acts on the local site carries `--uri=<site>`.

use serde_yaml::Value;
use siteenv::environment::{CommandSpec, OptionValue, SELF_ALIAS};
use siteenv::settings::DEFAULT_SITE;
use siteenv::{Error, Result, Site};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::process::{Command as StdCommand, Stdio};

/// Runs the tool without interactive confirmation.
const YES_FLAG: &str = "-y";

/// Runs tool subcommands against one site.
#[derive(Debug)]
pub struct ToolSite {
    tool: String,
    root: Option<PathBuf>,
    uri: Option<String>,
    enabled: Option<BTreeSet<String>>,
    roles: Option<BTreeMap<String, String>>,
}

impl ToolSite {
    /// Creates a site that runs `tool` inside `root` (or the working
    /// directory when no root is given).
    pub fn new(tool: impl Into<String>, root: Option<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            root,
            uri: None,
            enabled: None,
            roles: None,
        }
    }

    /// Targets the site directory `site` under `sites/`.
    ///
    /// The default site needs no selection.
    #[must_use]
    pub fn with_site(mut self, site: &str) -> Self {
        self.uri = (!site.is_empty() && site != DEFAULT_SITE).then(|| format!("--uri={site}"));
        self
    }

    /// Inserts the site selection into a local argument list.
    fn scoped(&self, mut argv: Vec<String>) -> Vec<String> {
        if let Some(uri) = &self.uri {
            let at = usize::from(argv.first().is_some_and(|arg| arg == SELF_ALIAS));
            argv.insert(at, uri.clone());
        }
        argv
    }

    fn command(&self, args: &[String]) -> StdCommand {
        let mut command = StdCommand::new(&self.tool);
        command.args(args).stdin(Stdio::null());
        if let Some(root) = &self.root {
            command.current_dir(root);
        }
        command
    }

    /// Runs a query and returns its standard output.
    fn query(&self, args: &[String]) -> Result<String> {
        let operation = operation_name(args);
        log::debug!("Running {} {}", self.tool, args.join(" "));

        let output = self
            .command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| Error::site(operation.clone(), e.to_string()))?;

        if !output.status.success() {
            return Err(Error::site(operation, output.status.to_string()));
        }

        String::from_utf8(output.stdout).map_err(|e| Error::site(operation, e.to_string()))
    }

    /// Runs a command with inherited output.
    fn run(&self, args: &[String]) -> Result<()> {
        let operation = operation_name(args);
        log::debug!("Running {} {}", self.tool, args.join(" "));

        let status = self
            .command(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Error::site(operation.clone(), e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::site(operation, status.to_string()))
        }
    }

    fn enabled_modules(&mut self) -> Result<&BTreeSet<String>> {
        if self.enabled.is_none() {
            let listing = self.query(&self.scoped(args([
                "pm-list",
                "--status=enabled",
                "--type=module",
                "--pipe",
            ])))?;
            self.enabled = Some(parse_module_list(&listing));
        }
        Ok(self.enabled.get_or_insert_with(BTreeSet::new))
    }

    fn role_ids(&mut self) -> Result<&BTreeMap<String, String>> {
        if self.roles.is_none() {
            let listing = self.query(&self.scoped(args(["role-list", "--format=json"])))?;
            let roles = parse_role_list(&listing)
                .map_err(|e| Error::site("role-list", e.to_string()))?;
            self.roles = Some(roles);
        }
        Ok(self.roles.get_or_insert_with(BTreeMap::new))
    }
}

impl Site for ToolSite {
    fn module_enabled(&mut self, module: &str) -> Result<bool> {
        Ok(self.enabled_modules()?.contains(module))
    }

    fn enable_modules(&mut self, modules: &[String]) -> Result<()> {
        self.run(&self.scoped(args([YES_FLAG, "pm-enable", &modules.join(",")])))?;
        if let Some(enabled) = &mut self.enabled {
            enabled.extend(modules.iter().cloned());
        }
        Ok(())
    }

    fn disable_modules(&mut self, modules: &[String]) -> Result<()> {
        self.run(&self.scoped(args([YES_FLAG, "pm-disable", &modules.join(",")])))?;
        if let Some(enabled) = &mut self.enabled {
            for module in modules {
                enabled.remove(module);
            }
        }
        Ok(())
    }

    fn set_variable(&mut self, name: &str, value: &Value) -> Result<()> {
        let mut argv = args([YES_FLAG, "variable-set", "--exact"]);
        match value {
            Value::String(s) => argv.extend([name.to_string(), s.clone()]),
            Value::Number(n) => argv.extend([name.to_string(), n.to_string()]),
            Value::Bool(b) => argv.extend([name.to_string(), u8::from(*b).to_string()]),
            structured => {
                let json = serde_json::to_string(structured)
                    .map_err(|e| Error::site("variable-set", e.to_string()))?;
                argv.extend(["--format=json".to_string(), name.to_string(), json]);
            }
        }
        self.run(&self.scoped(argv))
    }

    fn delete_variable(&mut self, name: &str) -> Result<()> {
        self.run(&self.scoped(args([YES_FLAG, "variable-delete", "--exact", name])))
    }

    fn role_id(&mut self, role: &str) -> Result<Option<String>> {
        Ok(self.role_ids()?.get(role).cloned())
    }

    fn grant_permissions(&mut self, role_id: &str, permissions: &[String]) -> Result<()> {
        self.run(&self.scoped(args([
            YES_FLAG,
            "role-add-perm",
            role_id,
            &permissions.join(","),
        ])))
    }

    fn revoke_permissions(&mut self, role_id: &str, permissions: &[String]) -> Result<()> {
        self.run(&self.scoped(args([
            YES_FLAG,
            "role-remove-perm",
            role_id,
            &permissions.join(","),
        ])))
    }

    fn invoke(&mut self, command: &CommandSpec) -> Result<()> {
        let argv = command_line(command);
        if command.alias == SELF_ALIAS {
            self.run(&self.scoped(argv))
        } else {
            self.run(&argv)
        }
    }
}

fn args<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|part| (*part).to_string()).collect()
}

/// The tool subcommand an argument list runs, for error messages.
fn operation_name(args: &[String]) -> String {
    args.iter()
        .find(|arg| !arg.starts_with('-') && !arg.starts_with('@'))
        .cloned()
        .unwrap_or_default()
}

/// The argument list for a follow-on command.
///
/// Unlike the displayed form, every option the command carries is passed
/// through, `--config` included.
pub fn command_line(command: &CommandSpec) -> Vec<String> {
    let mut argv = vec![command.alias.clone()];
    if command.is_confirmed() {
        argv.push(YES_FLAG.to_string());
    }
    argv.push(command.name.clone());
    argv.extend(command.arguments.iter().cloned());
    for (name, value) in command.options.iter() {
        if name == "yes" {
            continue;
        }
        argv.push(match value {
            OptionValue::Flag => format!("--{name}"),
            OptionValue::Value(v) => format!("--{name}={v}"),
        });
    }
    argv
}

/// Module names from `pm-list --pipe` output, one per line.
fn parse_module_list(listing: &str) -> BTreeSet<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Role names to ids from `role-list --format=json` output.
///
/// Accepts both `{"1": {"label": "anonymous user"}}` and
/// `{"1": "anonymous user"}`.
fn parse_role_list(listing: &str) -> serde_json::Result<BTreeMap<String, String>> {
    let parsed: BTreeMap<String, serde_json::Value> = serde_json::from_str(listing)?;
    Ok(parsed
        .into_iter()
        .filter_map(|(id, entry)| {
            let label = match &entry {
                serde_json::Value::String(label) => label.clone(),
                serde_json::Value::Object(fields) => {
                    fields.get("label")?.as_str()?.to_string()
                }
                _ => return None,
            };
            Some((label, id))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_passes_config() {
        let command = CommandSpec::new("updatedb")
            .with_alias("@dev")
            .with_flag("yes")
            .with_argument("all")
            .with_flag("verbose")
            .with_option("config", "/etc/drush/dev.ini");

        assert_eq!(
            command_line(&command),
            vec![
                "@dev",
                "-y",
                "updatedb",
                "all",
                "--verbose",
                "--config=/etc/drush/dev.ini"
            ]
        );
    }

    #[test]
    fn test_site_selection_scopes_local_calls() {
        let site = ToolSite::new("drush", None).with_site("example.com");
        assert_eq!(
            site.scoped(args([YES_FLAG, "pm-enable", "devel"])),
            args(["--uri=example.com", YES_FLAG, "pm-enable", "devel"])
        );
        assert_eq!(
            site.scoped(args([SELF_ALIAS, "cache-clear", "all"])),
            args([SELF_ALIAS, "--uri=example.com", "cache-clear", "all"])
        );

        let default = ToolSite::new("drush", None).with_site(DEFAULT_SITE);
        assert_eq!(default.scoped(args(["role-list"])), args(["role-list"]));
    }

    #[test]
    fn test_parse_module_list() {
        let modules = parse_module_list("devel\n  views_ui\n\n");
        assert_eq!(
            modules.into_iter().collect::<Vec<_>>(),
            vec!["devel", "views_ui"]
        );
    }

    #[test]
    fn test_parse_role_list_shapes() {
        let roles = parse_role_list(
            r#"{"1": {"label": "anonymous user", "perms": []}, "3": "editor", "4": 7}"#,
        )
        .unwrap();

        assert_eq!(roles.get("anonymous user"), Some(&"1".to_string()));
        assert_eq!(roles.get("editor"), Some(&"3".to_string()));
        assert_eq!(roles.len(), 2);
        assert!(parse_role_list("not json").is_err());
    }

    #[test]
    fn test_operation_name_skips_flags_and_aliases() {
        assert_eq!(operation_name(&args(["-y", "pm-enable", "devel"])), "pm-enable");
        assert_eq!(operation_name(&args(["@self", "cache-clear"])), "cache-clear");
    }
}
