//! Top-level batch entry point wiring config, enumeration, the engine, and
//! the sink together for the CLI.

use crate::engine::Orchestrator;
use crate::enumerate::{build_requests, expand_inputs};
use crate::sink::CsvSink;
use crate::summary::RunSummary;
use satbench_config::Config;
use satbench_core::Result;
use satbench_trial::{SymmetryBreaker, TrialRunner};
use std::sync::Arc;
use tracing::info;

/// Run the full batch described by `config`. Returns the status counts;
/// individual outcomes live in the results CSV.
pub async fn run_batch(config: &Config) -> Result<RunSummary> {
    let inputs = expand_inputs(&config.cnf_sources)?;
    let requests = build_requests(&config.solvers, &inputs, config.timeout);
    info!(
        solvers = config.solvers.len(),
        inputs = inputs.len(),
        trials = requests.len(),
        results = %config.results_csv.display(),
        "batch enumerated"
    );

    let mut runner = TrialRunner::new();
    if let Some(symmetry) = &config.symmetry {
        runner = runner.with_symmetry_breaker(SymmetryBreaker::new(
            &symmetry.breaker_path,
            symmetry.use_temp_files,
        ));
    }

    let sink = Arc::new(CsvSink::new(&config.results_csv));
    let outcomes = Orchestrator::new(config.max_workers)
        .run(requests, runner, sink)
        .await?;

    Ok(RunSummary::from_outcomes(&outcomes))
}
