//! Definition merging.
//!
//! Each section has its own policy:
//!
//! - modules: union; a later definition may move a module to the other status
//! - variables: later values win; nested mappings merge key by key
//! - permissions: merged per role, then per permission, later values win
//! - commands: appended in order, exact duplicates collapse

use serde_yaml::Value;

use super::schema::Definition;

/// Merges definitions into an accumulated plan.
///
/// # Examples
///
/// ```
/// use siteenv::environment::{Definition, PlanMerger};
/// use serde_yaml::Value;
///
/// let mut base = Definition::default();
/// base.variables.insert("cache", Value::from(1));
///
/// let mut overlay = Definition::default();
/// overlay.variables.insert("cache", Value::from(0));
///
/// PlanMerger::merge_into(&mut base, &overlay);
/// assert_eq!(base.variables.get("cache"), Some(&Value::from(0)));
/// ```
pub struct PlanMerger;

impl PlanMerger {
    /// Merges `source` into `target`; `source` has the higher precedence.
    pub fn merge_into(target: &mut Definition, source: &Definition) {
        for (status, modules) in source.modules.groups() {
            for module in modules {
                target.modules.set(module.clone(), status);
            }
        }

        for (name, value) in source.variables.iter() {
            match target.variables.get_mut(name) {
                Some(existing) => merge_value(existing, value),
                None => {
                    target.variables.insert(name, value.clone());
                }
            }
        }

        for (role, grants) in source.permissions.iter() {
            let merged = target
                .permissions
                .entry_or_insert_with(role, Default::default);
            for (permission, grant) in grants.iter() {
                merged.insert(permission, *grant);
            }
        }

        for command in &source.commands {
            if !target.commands.contains(command) {
                target.commands.push(command.clone());
            }
        }

        for section in &source.unknown_sections {
            if !target.unknown_sections.contains(section) {
                target.unknown_sections.push(section.clone());
            }
        }
    }
}

/// Merges a YAML value into another.
///
/// Mappings merge key by key, recursively; any other value replaces the
/// target.
pub fn merge_value(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Mapping(target_map), Value::Mapping(source_map)) => {
            for (key, value) in source_map {
                match target_map.get_mut(key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        target_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, source) => *target = source.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::schema::{CommandSpec, Grant, ModuleStatus};

    fn yaml(src: &str) -> Value {
        serde_yaml::from_str(src).unwrap()
    }

    #[test]
    fn test_modules_union() {
        let mut a = Definition::default();
        a.modules.set("m1", ModuleStatus::Enable);
        let mut b = Definition::default();
        b.modules.set("m2", ModuleStatus::Enable);
        b.modules.set("m1", ModuleStatus::Enable);

        PlanMerger::merge_into(&mut a, &b);
        assert_eq!(a.modules.enabled(), &["m1".to_string(), "m2".to_string()]);
    }

    #[test]
    fn test_later_module_status_wins() {
        let mut a = Definition::default();
        a.modules.set("devel", ModuleStatus::Enable);
        let mut b = Definition::default();
        b.modules.set("devel", ModuleStatus::Disable);

        PlanMerger::merge_into(&mut a, &b);
        assert!(a.modules.enabled().is_empty());
        assert_eq!(a.modules.disabled(), &["devel".to_string()]);
    }

    #[test]
    fn test_variables_override_and_recurse() {
        let mut a = Definition::default();
        a.variables.insert("x", Value::from("a"));
        a.variables.insert("nested", yaml("{one: 1, two: {deep: a}}"));
        a.variables.insert("list", yaml("[1, 2, 3]"));

        let mut b = Definition::default();
        b.variables.insert("x", Value::from("b"));
        b.variables.insert("nested", yaml("{two: {deep: b, extra: c}, three: 3}"));
        b.variables.insert("list", yaml("[9]"));

        PlanMerger::merge_into(&mut a, &b);
        assert_eq!(a.variables.get("x"), Some(&Value::from("b")));
        assert_eq!(
            a.variables.get("nested"),
            Some(&yaml("{one: 1, two: {deep: b, extra: c}, three: 3}"))
        );
        assert_eq!(a.variables.get("list"), Some(&yaml("[9]")));
    }

    #[test]
    fn test_permissions_merge_per_role() {
        let mut a = Definition::default();
        a.permissions.insert(
            "editor",
            [("edit any page", Grant::Grant), ("delete pages", Grant::Grant)]
                .into_iter()
                .collect(),
        );
        let mut b = Definition::default();
        b.permissions
            .insert("editor", [("delete pages", Grant::Revoke)].into_iter().collect());
        b.permissions
            .insert("anonymous user", [("access content", Grant::Grant)].into_iter().collect());

        PlanMerger::merge_into(&mut a, &b);
        let editor = a.permissions.get("editor").unwrap();
        assert_eq!(editor.get("edit any page"), Some(&Grant::Grant));
        assert_eq!(editor.get("delete pages"), Some(&Grant::Revoke));
        assert!(a.permissions.contains_key("anonymous user"));
    }

    #[test]
    fn test_commands_append_without_duplicates() {
        let mut a = Definition::default();
        a.commands.push(CommandSpec::new("cache-clear").with_argument("all"));
        let mut b = Definition::default();
        b.commands.push(CommandSpec::new("cache-clear").with_argument("all"));
        b.commands.push(CommandSpec::new("cron"));

        PlanMerger::merge_into(&mut a, &b);
        let names: Vec<_> = a.commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["cache-clear", "cron"]);
    }

    #[test]
    fn test_merge_into_empty_copies() {
        let mut source = Definition::default();
        source.variables.insert("a", Value::from(1));
        source.unknown_sections.push("blocks".into());
        let mut target = Definition::default();
        PlanMerger::merge_into(&mut target, &source);
        assert_eq!(target, source);
    }
}

// Property-based tests for plan merging
#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::environment::schema::ModuleStatus;
    use proptest::prelude::*;

    fn variables_strategy() -> impl Strategy<Value = Vec<(String, i64)>> {
        proptest::collection::vec(("[a-e]{1,3}", any::<i64>()), 0..8)
    }

    fn definition_with(vars: &[(String, i64)], modules: &[String]) -> Definition {
        let mut def = Definition::default();
        for (name, value) in vars {
            def.variables.insert(name.clone(), Value::from(*value));
        }
        for module in modules {
            def.modules.set(module.clone(), ModuleStatus::Enable);
        }
        def
    }

    proptest! {
        /// Merging an empty definition changes nothing.
        #[test]
        fn prop_empty_is_identity(
            vars in variables_strategy(),
            modules in proptest::collection::vec("[a-z]{1,6}", 0..6),
        ) {
            let mut def = definition_with(&vars, &modules);
            let original = def.clone();
            PlanMerger::merge_into(&mut def, &Definition::default());
            prop_assert_eq!(def, original);
        }

        /// Later definitions win every variable they set.
        #[test]
        fn prop_right_bias(a in variables_strategy(), b in variables_strategy()) {
            let mut merged = definition_with(&a, &[]);
            let overlay = definition_with(&b, &[]);
            PlanMerger::merge_into(&mut merged, &overlay);

            for (name, value) in overlay.variables.iter() {
                prop_assert_eq!(merged.variables.get(name), Some(value));
            }
        }

        /// Enabled modules from both sides survive the merge.
        #[test]
        fn prop_module_union(
            a in proptest::collection::vec("[a-z]{1,6}", 0..6),
            b in proptest::collection::vec("[a-z]{1,6}", 0..6),
        ) {
            let mut merged = definition_with(&[], &a);
            PlanMerger::merge_into(&mut merged, &definition_with(&[], &b));

            for module in a.iter().chain(b.iter()) {
                prop_assert_eq!(merged.modules.status_of(module), Some(ModuleStatus::Enable));
            }
        }

        /// Merging the same definition twice is the same as merging it once.
        #[test]
        fn prop_merge_idempotent(
            vars in variables_strategy(),
            modules in proptest::collection::vec("[a-z]{1,6}", 0..6),
        ) {
            let source = definition_with(&vars, &modules);
            let mut once = Definition::default();
            PlanMerger::merge_into(&mut once, &source);
            let mut twice = once.clone();
            PlanMerger::merge_into(&mut twice, &source);
            prop_assert_eq!(once, twice);
        }
    }
}
