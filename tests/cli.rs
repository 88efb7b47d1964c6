//! CLI-level tests running the real binary against scripted solvers.

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn full_batch_exits_zero_and_reports_summary() {
    let dir = tempdir().unwrap();
    let solver = write_script(dir.path(), "sat.sh", "#!/bin/sh\nexit 10\n");
    let cnf = dir.path().join("a.cnf");
    fs::write(&cnf, "p cnf 1 1\n1 0\n").unwrap();
    let results = dir.path().join("results.csv");

    let config = dir.path().join("satbench.json");
    fs::write(
        &config,
        serde_json::json!({
            "cnf_files": [cnf],
            "timeout": 5,
            "maxthreads": 1,
            "results_csv": results,
        })
        .to_string(),
    )
    .unwrap();

    let solvers = dir.path().join("solvers.json");
    fs::write(
        &solvers,
        serde_json::json!([{ "name": "sat", "path": solver }]).to_string(),
    )
    .unwrap();

    Command::cargo_bin("satbench")
        .unwrap()
        .args(["--config"])
        .arg(&config)
        .arg("--solvers")
        .arg(&solvers)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 trials: 1 completed"));

    assert!(results.is_file());
}

#[test]
fn failing_solver_still_exits_zero() {
    let dir = tempdir().unwrap();
    let cnf = dir.path().join("a.cnf");
    fs::write(&cnf, "p cnf 1 1\n1 0\n").unwrap();
    let results = dir.path().join("results.csv");

    let config = dir.path().join("satbench.json");
    fs::write(
        &config,
        serde_json::json!({
            "cnf_files": [cnf],
            "timeout": 5,
            "maxthreads": 1,
            "results_csv": results,
        })
        .to_string(),
    )
    .unwrap();

    let solvers = dir.path().join("solvers.json");
    fs::write(
        &solvers,
        serde_json::json!([{ "name": "ghost", "path": dir.path().join("missing") }]).to_string(),
    )
    .unwrap();

    Command::cargo_bin("satbench")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .arg("--solvers")
        .arg(&solvers)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 failed"));
}

#[test]
fn missing_config_file_is_a_fatal_error() {
    let dir = tempdir().unwrap();

    Command::cargo_bin("satbench")
        .unwrap()
        .arg("--config")
        .arg(dir.path().join("nope.json"))
        .arg("--solvers")
        .arg(dir.path().join("nope-solvers.json"))
        .assert()
        .failure();
}
