//! Solver output parsing
//!
//! Extracts the verdict and the common MiniSat-style statistics from raw
//! solver stdout. Solvers the parser does not recognize still produce a
//! valid outcome: every field here is optional and the verdict falls back to
//! the DIMACS exit-code convention (10 = SAT, 20 = UNSAT).

use satbench_core::{EXIT_CODE_SAT, EXIT_CODE_UNSAT};

/// Fields recovered from a solver's stdout and exit code.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SolverStats {
    pub verdict: Option<String>,
    pub conflicts: Option<u64>,
    pub decisions: Option<u64>,
    pub propagations: Option<u64>,
    pub cpu_time: Option<f64>,
}

/// Parse a completed solver's stdout together with its exit code.
#[must_use]
pub fn parse_solver_output(stdout: &str, exit_code: Option<i32>) -> SolverStats {
    let mut stats = SolverStats::default();

    for line in stdout.lines() {
        if let Some(rest) = line.strip_prefix("s ") {
            stats.verdict = Some(rest.trim().to_string());
        } else if line.contains("CPU time") {
            stats.cpu_time = cpu_time_value(line).or(stats.cpu_time);
        } else if line.contains("conflicts") {
            stats.conflicts = stat_value(line).or(stats.conflicts);
        } else if line.contains("decisions") {
            stats.decisions = stat_value(line).or(stats.decisions);
        } else if line.contains("propagations") {
            stats.propagations = stat_value(line).or(stats.propagations);
        }
    }

    if stats.verdict.is_none() {
        stats.verdict = Some(
            match exit_code {
                Some(EXIT_CODE_SAT) => "SAT",
                Some(EXIT_CODE_UNSAT) => "UNSAT",
                _ => "UNKNOWN",
            }
            .to_string(),
        );
    }

    stats
}

/// First integer after the colon in a `name : value ...` statistics line.
fn stat_value(line: &str) -> Option<u64> {
    let (_, rest) = line.split_once(':')?;
    rest.split_whitespace().next()?.parse().ok()
}

/// First number after the colon in a `CPU time : 0.002 s` line. The unit
/// token is optional.
fn cpu_time_value(line: &str) -> Option<f64> {
    let (_, rest) = line.split_once(':')?;
    rest.split_whitespace().next()?.parse().ok()
}
