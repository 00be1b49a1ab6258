#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn crosstack(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("crosstack").unwrap();
    cmd.current_dir(dir);
    cmd
}

/// Help lists every subcommand
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("crosstack").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("synth"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("destroy"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("crosstack").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("crosstack"));
}

#[test]
fn test_invalid_command() {
    let mut cmd = Command::cargo_bin("crosstack").unwrap();
    cmd.arg("invalid-command").assert().failure();
}

/// Synth writes one artifact file per stack; the config variant's consumer
/// artifact carries no imports
#[test]
fn test_synth_writes_artifacts() {
    let temp = tempfile::tempdir().unwrap();

    crosstack(temp.path())
        .args(["synth", "--variant", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("producer"))
        .stdout(predicate::str::contains("consumer"));

    let consumer = temp.path().join(".crosstack/out/consumer.json");
    let content = std::fs::read_to_string(consumer).unwrap();
    let artifact: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(artifact["imports"].as_array().unwrap().len(), 0);
}

/// Without --yes the plan is shown but nothing is applied
#[test]
fn test_deploy_requires_confirmation() {
    let temp = tempfile::tempdir().unwrap();

    crosstack(temp.path())
        .args(["deploy", "--variant", "direct"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Run again with --yes"));

    crosstack(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No stacks deployed"));
}

/// The coupled pair shows its import edge and phase
#[test]
fn test_direct_deploy_is_coupled() {
    let temp = tempfile::tempdir().unwrap();

    crosstack(temp.path())
        .args(["deploy", "--variant", "direct", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deploy complete"));

    crosstack(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "import producer:UsersTable:name from producer",
        ))
        .stdout(predicate::str::contains("phase: coupled"));
}

/// The config pair deploys to an already-decoupled state
#[test]
fn test_config_deploy_is_decoupled() {
    let temp = tempfile::tempdir().unwrap();

    crosstack(temp.path())
        .args(["deploy", "--variant", "config", "--yes"])
        .assert()
        .success();

    crosstack(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("phase: decoupled"));
}

/// The full two-phase migration, including the out-of-order rejection
#[test]
fn test_two_phase_migration_workflow() {
    let temp = tempfile::tempdir().unwrap();

    crosstack(temp.path())
        .args(["deploy", "--variant", "direct", "--yes"])
        .assert()
        .success();

    // Skipping phase B is exactly the rejected operation
    crosstack(temp.path())
        .args(["migrate", "--step", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("still imported by stack 'consumer'"));

    crosstack(temp.path())
        .args(["migrate", "--step", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("phase: half-decoupled"));

    crosstack(temp.path())
        .args(["migrate", "--step", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("phase: decoupled"));

    crosstack(temp.path())
        .args(["destroy", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Destroy complete"));

    crosstack(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No stacks deployed"));
}

#[test]
fn test_invalid_migration_step() {
    let temp = tempfile::tempdir().unwrap();

    crosstack(temp.path())
        .args(["migrate", "--step", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid migration step"));
}

/// The context file overrides the shared table name
#[test]
fn test_context_file_overrides_table_name() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(
        temp.path().join("crosstack.json"),
        r#"{"table_name": "Accounts"}"#,
    )
    .unwrap();

    crosstack(temp.path())
        .args(["deploy", "--variant", "direct", "--yes"])
        .assert()
        .success();

    crosstack(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("export producer:UsersTable:name = \"Accounts\""))
        .stdout(predicate::str::contains("phase: coupled"));
}
