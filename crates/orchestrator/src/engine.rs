//! The orchestration engine
//!
//! Fans a request list out over a bounded pool of worker tasks. Each worker
//! pulls the next pending request from a shared queue, drives the trial
//! executor, streams the outcome into the sink, and moves on. The engine
//! guarantees exactly one outcome per request: trial failures and timeouts
//! are data, not errors. Only a sink write failure is fatal.

use crate::sink::CsvSink;
use satbench_core::{Error, Result, TrialOutcome, TrialRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::task::JoinSet;
use tracing::info;

use satbench_trial::TrialRunner;

/// Bounded fan-out scheduler over the trial executor.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    max_workers: usize,
}

impl Orchestrator {
    /// `max_workers` is clamped to at least 1.
    #[must_use]
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    /// Run every request to completion. Returns one outcome per request;
    /// with one worker the output order matches the input order, with more
    /// workers it is arrival order.
    pub async fn run(
        &self,
        requests: Vec<TrialRequest>,
        runner: TrialRunner,
        sink: Arc<CsvSink>,
    ) -> Result<Vec<TrialOutcome>> {
        let total = requests.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let queue = Arc::new(Mutex::new(VecDeque::from(requests)));
        let outcomes = Arc::new(Mutex::new(Vec::with_capacity(total)));
        let workers = self.max_workers.min(total);

        info!(trials = total, workers, "starting batch");

        let mut join_set = JoinSet::new();
        for worker in 0..workers {
            let queue = Arc::clone(&queue);
            let outcomes = Arc::clone(&outcomes);
            let runner = runner.clone();
            let sink = Arc::clone(&sink);

            join_set.spawn(async move {
                loop {
                    let request = {
                        let mut queue = queue
                            .lock()
                            .map_err(|e| Error::internal(format!("queue lock poisoned: {e}")))?;
                        queue.pop_front()
                    };
                    let Some(request) = request else {
                        return Ok::<(), Error>(());
                    };

                    info!(
                        worker,
                        solver = %request.solver.name,
                        input = %request.input.display(),
                        "running trial"
                    );
                    let outcome = runner.run(&request).await;

                    // Stream immediately so a crash later in the batch still
                    // leaves every finished trial on disk.
                    sink.append(&outcome).await?;

                    outcomes
                        .lock()
                        .map_err(|e| Error::internal(format!("outcome lock poisoned: {e}")))?
                        .push(outcome);
                }
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    join_set.abort_all();
                    return Err(e);
                }
                Err(e) => {
                    join_set.abort_all();
                    return Err(Error::internal(format!("worker task failed: {e}")));
                }
            }
        }

        let outcomes = Arc::try_unwrap(outcomes)
            .map_err(|_| Error::internal("outcome collection still shared"))?
            .into_inner()
            .map_err(|e| Error::internal(format!("outcome lock poisoned: {e}")))?;

        debug_assert_eq!(outcomes.len(), total);
        Ok(outcomes)
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use satbench_core::{SolverSpec, TrialStatus};
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use tempfile::tempdir;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn solver(name: &str, path: PathBuf) -> Arc<SolverSpec> {
        Arc::new(SolverSpec {
            name: name.to_string(),
            path,
            args: vec![],
            env: Default::default(),
            enabled: true,
        })
    }

    fn requests_for(
        solvers: &[Arc<SolverSpec>],
        inputs: &[PathBuf],
        timeout: Duration,
    ) -> Vec<TrialRequest> {
        crate::enumerate::build_requests(solvers, inputs, timeout)
    }

    #[tokio::test]
    async fn one_outcome_per_request_despite_failures() {
        let dir = tempdir().unwrap();
        let good = write_script(dir.path(), "good.sh", "#!/bin/sh\nexit 10\n");
        let missing = dir.path().join("missing-solver");
        let input = dir.path().join("a.cnf");
        fs::write(&input, "p cnf 0 0\n").unwrap();

        let solvers = [solver("good", good), solver("missing", missing)];
        let requests = requests_for(&solvers, &[input], Duration::from_secs(5));

        let sink = Arc::new(CsvSink::new(dir.path().join("results.csv")));
        let outcomes = Orchestrator::new(2)
            .run(requests, TrialRunner::new(), sink)
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        let failed = outcomes
            .iter()
            .filter(|o| o.status == TrialStatus::Failed)
            .count();
        assert_eq!(failed, 1);
    }

    #[tokio::test]
    async fn single_worker_preserves_request_order() {
        let dir = tempdir().unwrap();
        let solver_path = write_script(dir.path(), "echo.sh", "#!/bin/sh\nexit 10\n");
        let mut inputs = Vec::new();
        for name in ["a.cnf", "b.cnf", "c.cnf", "d.cnf"] {
            let path = dir.path().join(name);
            fs::write(&path, "p cnf 0 0\n").unwrap();
            inputs.push(path);
        }

        let solvers = [solver("echo", solver_path)];
        let requests = requests_for(&solvers, &inputs, Duration::from_secs(5));
        let expected: Vec<_> = requests.iter().map(|r| r.input.clone()).collect();

        let sink = Arc::new(CsvSink::new(dir.path().join("results.csv")));
        let outcomes = Orchestrator::new(1)
            .run(requests, TrialRunner::new(), sink)
            .await
            .unwrap();

        let got: Vec<_> = outcomes.iter().map(|o| o.input.clone()).collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn timed_out_trial_does_not_block_siblings() {
        let dir = tempdir().unwrap();
        let slow = write_script(dir.path(), "slow.sh", "#!/bin/sh\nsleep 30\n");
        let fast = write_script(dir.path(), "fast.sh", "#!/bin/sh\nexit 10\n");
        let input = dir.path().join("a.cnf");
        fs::write(&input, "p cnf 0 0\n").unwrap();

        let solvers = [solver("slow", slow), solver("fast", fast)];
        let requests = requests_for(&solvers, &[input], Duration::from_secs(1));

        let sink = Arc::new(CsvSink::new(dir.path().join("results.csv")));
        let started = std::time::Instant::now();
        let outcomes = Orchestrator::new(2)
            .run(requests, TrialRunner::new(), sink)
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().any(|o| o.status == TrialStatus::TimedOut));
        assert!(outcomes.iter().any(|o| o.status == TrialStatus::Completed));
        assert!(started.elapsed() < Duration::from_secs(20));
    }
}
