//! Domain value types shared across the workspace.
//!
//! All of these are immutable once constructed. `SolverSpec` is loaded from
//! the solver definition file at startup and shared by reference across
//! workers; `TrialRequest` values are produced by the work enumerator and
//! consumed exactly once; `TrialOutcome` values are appended exactly once to
//! the result sink.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// One external solver under benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverSpec {
    /// Human-readable name, unique across the solver definition file
    pub name: String,
    /// Path to the solver executable
    pub path: PathBuf,
    /// Extra arguments appended before the CNF path
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment overrides merged into the child process environment
    #[serde(default)]
    pub env: HashMap<String, String>,
    /// Disabled solvers are skipped by the enumerator
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// One (solver, input) pair scheduled for execution.
#[derive(Debug, Clone)]
pub struct TrialRequest {
    pub solver: Arc<SolverSpec>,
    pub input: PathBuf,
    pub timeout: Duration,
}

/// Terminal state of a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialStatus {
    /// The solver process started and exited on its own
    Completed,
    /// The wall-clock deadline expired and the process group was killed
    TimedOut,
    /// The solver or the symmetry breaker could not run to completion
    Failed,
}

impl fmt::Display for TrialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrialStatus::Completed => "COMPLETED",
            TrialStatus::TimedOut => "TIMEOUT",
            TrialStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// Everything recorded about one trial. Exactly one of these exists per
/// `TrialRequest`, no matter how the trial ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Name of the `SolverSpec` that produced this outcome
    pub solver: String,
    /// Original input path (before any symmetry breaking)
    pub input: PathBuf,
    pub status: TrialStatus,
    /// Wall-clock duration of the trial in seconds
    pub elapsed_secs: f64,
    /// Exit code of the solver process, absent if it never started or was
    /// killed by a signal
    pub exit_code: Option<i32>,
    /// Solver verdict (SAT / UNSAT / UNKNOWN, or a raw `s ` line)
    pub verdict: Option<String>,
    /// Conflict count parsed from MiniSat-style statistics output
    pub conflicts: Option<u64>,
    /// Decision count parsed from MiniSat-style statistics output
    pub decisions: Option<u64>,
    /// Propagation count parsed from MiniSat-style statistics output
    pub propagations: Option<u64>,
    /// Solver-reported CPU time in seconds
    pub cpu_time: Option<f64>,
    /// Average CPU usage (percent) sampled over the solver's process subtree
    pub cpu_usage_avg: Option<f64>,
    /// Peak CPU usage (percent) sampled over the solver's process subtree
    pub cpu_usage_max: Option<f64>,
    /// Peak resident memory (MiB) sampled over the solver's process subtree
    pub memory_peak_mb: Option<f64>,
    /// Wall time spent in the symmetry breaker, when preprocessing ran
    pub break_time: Option<f64>,
    /// Captured stdout of the solver process, truncated
    pub stdout: String,
    /// Captured stderr of the solver process, truncated
    pub stderr: String,
    /// Present iff `status != Completed`
    pub error: Option<String>,
}

/// Canonical CSV column set. Fixed for the lifetime of an output file so
/// that rows appended by later runs always line up with the header.
pub const CSV_FIELDS: [&str; 17] = [
    "solver",
    "input",
    "status",
    "elapsed_secs",
    "exit_code",
    "verdict",
    "conflicts",
    "decisions",
    "propagations",
    "cpu_time",
    "cpu_usage_avg",
    "cpu_usage_max",
    "memory_peak_mb",
    "break_time",
    "stdout",
    "stderr",
    "error",
];

impl TrialOutcome {
    /// Skeleton outcome with no solver-reported data attached.
    #[must_use]
    pub fn new(solver: impl Into<String>, input: impl Into<PathBuf>, status: TrialStatus) -> Self {
        Self {
            solver: solver.into(),
            input: input.into(),
            status,
            elapsed_secs: 0.0,
            exit_code: None,
            verdict: None,
            conflicts: None,
            decisions: None,
            propagations: None,
            cpu_time: None,
            cpu_usage_avg: None,
            cpu_usage_max: None,
            memory_peak_mb: None,
            break_time: None,
            stdout: String::new(),
            stderr: String::new(),
            error: None,
        }
    }

    /// Outcome for a trial that hit its wall-clock deadline.
    #[must_use]
    pub fn timed_out(
        solver: impl Into<String>,
        input: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        let mut outcome = Self::new(solver, input, TrialStatus::TimedOut);
        outcome.elapsed_secs = timeout.as_secs_f64();
        outcome.error = Some(format!("timed out after {}s", timeout.as_secs_f64()));
        outcome
    }

    /// Outcome for a trial whose process could not run to completion.
    #[must_use]
    pub fn failed(
        solver: impl Into<String>,
        input: impl Into<PathBuf>,
        elapsed_secs: f64,
        error: impl Into<String>,
    ) -> Self {
        let mut outcome = Self::new(solver, input, TrialStatus::Failed);
        outcome.elapsed_secs = elapsed_secs;
        outcome.error = Some(error.into());
        outcome
    }

    /// Render this outcome as one CSV record in [`CSV_FIELDS`] order.
    #[must_use]
    pub fn to_record(&self) -> Vec<String> {
        fn opt<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        vec![
            self.solver.clone(),
            self.input.display().to_string(),
            self.status.to_string(),
            format!("{:.4}", self.elapsed_secs),
            opt(&self.exit_code),
            opt(&self.verdict),
            opt(&self.conflicts),
            opt(&self.decisions),
            opt(&self.propagations),
            opt(&self.cpu_time),
            opt(&self.cpu_usage_avg),
            opt(&self.cpu_usage_max),
            opt(&self.memory_peak_mb),
            opt(&self.break_time),
            self.stdout.clone(),
            self.stderr.clone(),
            opt(&self.error),
        ]
    }
}
