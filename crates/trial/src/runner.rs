//! The trial executor
//!
//! [`TrialRunner::run`] drives one (solver, input) trial end to end:
//! optional symmetry breaking, solver subprocess with merged environment and
//! appended arguments, wall-clock timeout with process-group kill, output
//! capture, and statistics parsing. It is infallible by contract: every
//! failure mode becomes a `TrialOutcome`, never an `Err`.

use crate::breaker::{BrokenCnf, SymmetryBreaker};
use crate::monitor::ResourceMonitor;
use crate::parse::parse_solver_output;
use crate::process::{drain_output, ProcessGuard, WaitOutcome};
use satbench_core::{TrialOutcome, TrialRequest, TrialStatus};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::debug;

/// Captured output streams are cut off here to keep CSV rows bounded.
const CAPTURE_LIMIT: usize = 4096;

/// Executes trials. Stateless apart from the optional symmetry breaker, so
/// one runner is shared by every worker.
#[derive(Debug, Clone, Default)]
pub struct TrialRunner {
    breaker: Option<SymmetryBreaker>,
}

impl TrialRunner {
    #[must_use]
    pub fn new() -> Self {
        Self { breaker: None }
    }

    /// Enable symmetry-breaking preprocessing for every trial.
    #[must_use]
    pub fn with_symmetry_breaker(mut self, breaker: SymmetryBreaker) -> Self {
        self.breaker = Some(breaker);
        self
    }

    /// Run one trial to completion. Never returns an error and never panics
    /// on subprocess trouble; the outcome's status tells the story.
    pub async fn run(&self, request: &TrialRequest) -> TrialOutcome {
        let solver = &request.solver;
        let started = Instant::now();

        // Preprocessing first: a breaker failure or timeout fails the trial
        // without ever starting the solver.
        let mut break_time = None;
        let broken: Option<BrokenCnf> = match &self.breaker {
            Some(breaker) => match breaker.run(&request.input, request.timeout).await {
                Ok(broken) => {
                    break_time = Some(broken.break_time);
                    Some(broken)
                }
                Err(e) => {
                    let mut outcome = TrialOutcome::failed(
                        &solver.name,
                        &request.input,
                        started.elapsed().as_secs_f64(),
                        format!("symmetry breaking failed: {e}"),
                    );
                    outcome.break_time = break_time;
                    return outcome;
                }
            },
            None => None,
        };

        // The solver gets whatever wall-clock budget the breaker left over.
        let spent = started.elapsed();
        if spent >= request.timeout {
            let mut outcome =
                TrialOutcome::timed_out(&solver.name, &request.input, request.timeout);
            outcome.break_time = break_time;
            return outcome;
        }
        let remaining = request.timeout - spent;

        let cnf_path: &Path = broken
            .as_ref()
            .map(BrokenCnf::path)
            .unwrap_or(&request.input);

        let mut cmd = Command::new(&solver.path);
        cmd.args(&solver.args)
            .arg(cnf_path)
            .envs(&solver.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        configure_platform_specific(&mut cmd);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                let mut outcome = TrialOutcome::failed(
                    &solver.name,
                    &request.input,
                    started.elapsed().as_secs_f64(),
                    format!("failed to start solver '{}': {e}", solver.path.display()),
                );
                outcome.break_time = break_time;
                return outcome;
            }
        };

        debug!(
            solver = %solver.name,
            input = %cnf_path.display(),
            pid = child.id(),
            "solver process started"
        );

        let (stdout_handle, stderr_handle) = drain_output(&mut child);
        let monitor = ResourceMonitor::start(child.id());
        let guard = ProcessGuard::new(child, remaining);

        let wait_result = guard.wait_with_timeout().await;
        let usage = monitor.finish();

        let mut outcome = match wait_result {
            Ok(WaitOutcome::Exited(status)) => {
                let stdout = stdout_handle.join().unwrap_or_default();
                let stderr = stderr_handle.join().unwrap_or_default();
                let stats = parse_solver_output(&stdout, status.code());

                let mut outcome =
                    TrialOutcome::new(&solver.name, &request.input, TrialStatus::Completed);
                outcome.elapsed_secs = started.elapsed().as_secs_f64();
                outcome.exit_code = status.code();
                outcome.verdict = stats.verdict;
                outcome.conflicts = stats.conflicts;
                outcome.decisions = stats.decisions;
                outcome.propagations = stats.propagations;
                outcome.cpu_time = stats.cpu_time;
                outcome.stdout = truncate(stdout);
                outcome.stderr = truncate(stderr);
                outcome
            }
            Ok(WaitOutcome::TimedOut) => {
                // The kill closed the pipes, so the readers finish promptly.
                let stdout = stdout_handle.join().unwrap_or_default();
                let stderr = stderr_handle.join().unwrap_or_default();
                let mut outcome =
                    TrialOutcome::timed_out(&solver.name, &request.input, request.timeout);
                outcome.stdout = truncate(stdout);
                outcome.stderr = truncate(stderr);
                outcome
            }
            Err(e) => TrialOutcome::failed(
                &solver.name,
                &request.input,
                started.elapsed().as_secs_f64(),
                e.to_string(),
            ),
        };

        outcome.cpu_usage_avg = usage.cpu_usage_avg;
        outcome.cpu_usage_max = usage.cpu_usage_max;
        outcome.memory_peak_mb = usage.memory_peak_mb;
        outcome.break_time = break_time;
        outcome
        // `broken` drops here: ephemeral transformed files are removed no
        // matter how the trial ended.
    }
}

fn configure_platform_specific(cmd: &mut Command) {
    // On Unix, make the solver its own process group leader so a timeout
    // kill reaps the full process subtree.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }
    #[cfg(not(unix))]
    {
        let _ = cmd;
    }
}

fn truncate(mut s: String) -> String {
    if s.len() > CAPTURE_LIMIT {
        let mut cut = CAPTURE_LIMIT;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
    }
    s
}
