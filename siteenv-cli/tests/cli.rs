//! Integration tests for argument handling, completions and `validate`.

mod common;

use common::TestEnv;
use predicates::prelude::*;

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();
    env.command_bare()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("summary"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_version() {
    let env = TestEnv::new();
    env.command_bare()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("siteenv"));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    let env = TestEnv::new();
    env.command_bare().assert().failure().code(2);
}

#[test]
fn test_completions_bash() {
    let env = TestEnv::new();
    env.command_bare()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("siteenv"))
        .stderr(predicate::str::contains("siteenv completions bash"));
}

// ============================================================================
// Validate
// ============================================================================

#[test]
fn test_validate_group_file() {
    let env = TestEnv::with_fixtures();
    let file = env.path().join("drush/env.drushrc.yml");

    env.command()
        .arg("validate")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Environment file is valid"))
        .stdout(predicate::str::contains("prod"))
        .stdout(predicate::str::contains("stage"));
}

#[test]
fn test_validate_warns_about_unknown_sections() {
    let env = TestEnv::new();
    let file = env.write(
        "drush/odd.env.drushrc.yml",
        "variables:\n  cache: 0\nblocks:\n  sidebar: 1\n",
    );

    env.command()
        .arg("validate")
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("I'm not sure what to do with 'blocks'."));
}

#[test]
fn test_validate_broken_file_fails() {
    let env = TestEnv::new();
    let file = env.write("drush/broken.env.drushrc.yml", "modules: [unclosed");

    env.command()
        .arg("validate")
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Parse error"));
}

#[test]
fn test_validate_missing_file_is_invalid_argument() {
    let env = TestEnv::new();

    env.command()
        .arg("validate")
        .arg(env.path().join("drush/none.env.drushrc.yml"))
        .assert()
        .code(4)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_validate_rejects_other_file_names() {
    let env = TestEnv::new();
    let file = env.write("drush/settings.yml", "cache: 0\n");

    env.command()
        .arg("validate")
        .arg(&file)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("not an environment file name"));
}
