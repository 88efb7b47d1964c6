//! End-to-end batch tests over real (scripted) solver processes.

#![cfg(unix)]

use satbench_config::Config;
use satbench_orchestrator::run_batch;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn solver(name: &str, path: PathBuf) -> Arc<satbench_core::SolverSpec> {
    Arc::new(satbench_core::SolverSpec {
        name: name.to_string(),
        path,
        args: vec![],
        env: Default::default(),
        enabled: true,
    })
}

fn row_count(path: &Path) -> usize {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader.records().count()
}

#[tokio::test]
async fn two_solvers_two_files_yield_four_outcomes() {
    let dir = tempdir().unwrap();
    let sat = write_script(dir.path(), "sat.sh", "#!/bin/sh\necho 's SATISFIABLE'\nexit 10\n");
    let unsat = write_script(dir.path(), "unsat.sh", "#!/bin/sh\nexit 20\n");
    let a = dir.path().join("a.cnf");
    let b = dir.path().join("b.cnf");
    fs::write(&a, "p cnf 1 1\n1 0\n").unwrap();
    fs::write(&b, "p cnf 1 1\n-1 0\n").unwrap();

    let config = Config {
        cnf_sources: vec![a, b],
        timeout: Duration::from_secs(5),
        max_workers: 2,
        symmetry: None,
        results_csv: dir.path().join("results.csv"),
        solvers: vec![solver("sat", sat), solver("unsat", unsat)],
    };

    let summary = run_batch(&config).await.unwrap();
    assert_eq!(summary.total(), 4);
    assert_eq!(summary.completed, 4);
    assert_eq!(row_count(&config.results_csv), 4);
}

#[tokio::test]
async fn directory_source_expands_to_every_file() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir(&corpus).unwrap();
    for name in ["x.cnf", "y.cnf", "z.cnf"] {
        fs::write(corpus.join(name), "p cnf 0 0\n").unwrap();
    }
    let sat = write_script(dir.path(), "sat.sh", "#!/bin/sh\nexit 10\n");

    let config = Config {
        cnf_sources: vec![corpus],
        timeout: Duration::from_secs(5),
        max_workers: 1,
        symmetry: None,
        results_csv: dir.path().join("results.csv"),
        solvers: vec![solver("sat", sat)],
    };

    let summary = run_batch(&config).await.unwrap();
    assert_eq!(summary.total(), 3);
}

#[tokio::test]
async fn second_run_appends_without_duplicating_header() {
    let dir = tempdir().unwrap();
    let sat = write_script(dir.path(), "sat.sh", "#!/bin/sh\nexit 10\n");
    let a = dir.path().join("a.cnf");
    fs::write(&a, "p cnf 1 1\n1 0\n").unwrap();

    let config = Config {
        cnf_sources: vec![a],
        timeout: Duration::from_secs(5),
        max_workers: 1,
        symmetry: None,
        results_csv: dir.path().join("results.csv"),
        solvers: vec![solver("sat", sat)],
    };

    run_batch(&config).await.unwrap();
    run_batch(&config).await.unwrap();

    let contents = fs::read_to_string(&config.results_csv).unwrap();
    let headers = contents
        .lines()
        .filter(|l| l.starts_with("solver,input"))
        .count();
    assert_eq!(headers, 1);
    assert_eq!(row_count(&config.results_csv), 2);
}

#[tokio::test]
async fn batch_survives_a_broken_solver() {
    let dir = tempdir().unwrap();
    let sat = write_script(dir.path(), "sat.sh", "#!/bin/sh\nexit 10\n");
    let a = dir.path().join("a.cnf");
    fs::write(&a, "p cnf 1 1\n1 0\n").unwrap();

    let config = Config {
        cnf_sources: vec![a],
        timeout: Duration::from_secs(5),
        max_workers: 2,
        symmetry: None,
        results_csv: dir.path().join("results.csv"),
        solvers: vec![
            solver("sat", sat),
            solver("ghost", dir.path().join("missing")),
        ],
    };

    let summary = run_batch(&config).await.unwrap();
    assert_eq!(summary.total(), 2);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.failed, 1);
}
