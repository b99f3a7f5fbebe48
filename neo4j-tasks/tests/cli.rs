//! Black-box tests of the `neo4j-tasks` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn neo4j_tasks() -> Command {
    let mut cmd = Command::cargo_bin("neo4j-tasks").unwrap();
    for var in [
        "NEO4J_ENV",
        "CONFIG_FILE",
        "LOG_LEVEL",
        "RUST_LOG",
        "NEO4J_TASKS_ENVIRONMENT",
        "NEO4J_TASKS_INSTALL__BASE_DIR",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    neo4j_tasks()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("restart"))
        .stdout(predicate::str::contains("reset"));
}

#[test]
fn test_info_resolves_test_environment() {
    let dir = TempDir::new().unwrap();
    neo4j_tasks()
        .args(["info", "--env", "test", "--base-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("neo4j_test"))
        .stdout(predicate::str::contains("75"))
        .stdout(predicate::str::contains("Installed:         no"));
}

#[test]
fn test_info_without_environment() {
    let dir = TempDir::new().unwrap();
    neo4j_tasks()
        .arg("info")
        .arg("--base-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(none)"))
        .stdout(predicate::str::contains("unchanged"));
}

#[test]
fn test_environment_from_env_var() {
    let dir = TempDir::new().unwrap();
    neo4j_tasks()
        .env("NEO4J_ENV", "development")
        .args(["info", "--base-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("neo4j_development"))
        .stdout(predicate::str::contains("74"));
}

#[test]
fn test_info_reports_unknown_environment_prefix() {
    let dir = TempDir::new().unwrap();
    neo4j_tasks()
        .args(["info", "--env", "staging", "--base-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No port prefix defined for environment 'staging'"));
}

#[test]
fn test_install_with_unknown_environment_fails_without_side_effects() {
    let dir = TempDir::new().unwrap();
    neo4j_tasks()
        .args(["install", "--env", "staging", "--base-dir"])
        .arg(dir.path())
        .args(["--download-url", "http://127.0.0.1:9"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No port prefix defined for environment 'staging'"));

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_invalid_environment_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    neo4j_tasks()
        .args(["info", "--env", "../etc", "--base-dir"])
        .arg(dir.path())
        .assert()
        .code(1);
}

#[test]
fn test_start_without_install_exits_with_usage_error() {
    let dir = TempDir::new().unwrap();
    neo4j_tasks()
        .args(["start", "--env", "test", "--base-dir"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Starting Neo4j..."))
        .stderr(predicate::str::contains("not installed"));
}

#[test]
fn test_reset_alias_is_accepted() {
    let dir = TempDir::new().unwrap();
    neo4j_tasks()
        .args(["reset-yes-i-am-sure", "--base-dir"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not installed"));
}
