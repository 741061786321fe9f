//! End-to-end checks of the `stonekeeper` binary's argument surface.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn stonekeeper() -> Command {
    Command::cargo_bin("stonekeeper").expect("binary built")
}

#[test]
fn help_lists_the_operations() {
    stonekeeper()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("create")
                .and(predicate::str::contains("backup"))
                .and(predicate::str::contains("destroy"))
                .and(predicate::str::contains("netldi")),
        );
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    stonekeeper().assert().failure().code(2);
}

#[test]
fn list_of_an_empty_host_prints_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let config_dir = dir.path().join("etc");
    stonekeeper()
        .arg("--config-dir")
        .arg(&config_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn list_names_configured_stones() {
    let dir = TempDir::new().expect("temp dir");
    let config_dir = dir.path().join("etc");
    std::fs::create_dir_all(&config_dir).expect("create config dir");
    std::fs::write(config_dir.join("seaside.conf"), b"").expect("write conf");
    stonekeeper()
        .arg("--config-dir")
        .arg(&config_dir)
        .arg("list")
        .assert()
        .success()
        .stdout("seaside\n");
}

#[test]
fn status_of_an_unknown_stone_fails_with_context() {
    let dir = TempDir::new().expect("temp dir");
    let config_dir = dir.path().join("etc");
    stonekeeper()
        .arg("--config-dir")
        .arg(&config_dir)
        .args(["status", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("stone 'ghost' does not exist"));
}

#[test]
fn rejects_a_malformed_log_filter() {
    stonekeeper()
        .args(["--log-filter", "stonekeeper=notalevel", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid log filter"));
}
