//! Shared constants for satbench

use std::time::Duration;

/// Default path of the run configuration file
pub const DEFAULT_CONFIG_FILE: &str = "satbench.json";

/// Default path of the solver definition file
pub const DEFAULT_SOLVERS_FILE: &str = "solvers.json";

/// Default output path when the configuration omits `results_csv`
pub const DEFAULT_RESULTS_CSV: &str = "results.csv";

/// Suffix appended to the input stem for persistent symmetry-broken files,
/// e.g. `problem.cnf` becomes `problem_sb.cnf`
pub const SYMMETRY_BREAK_SUFFIX: &str = "_sb";

/// Conventional DIMACS solver exit code for a satisfiable instance
pub const EXIT_CODE_SAT: i32 = 10;

/// Conventional DIMACS solver exit code for an unsatisfiable instance
pub const EXIT_CODE_UNSAT: i32 = 20;

/// How often a process guard polls a child for exit while waiting
pub const PROCESS_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How many times a sink append is retried before the run is aborted
pub const SINK_WRITE_ATTEMPTS: u32 = 3;
