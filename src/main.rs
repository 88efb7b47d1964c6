use clap::Parser;
use satbench_config::ConfigLoader;
use satbench_orchestrator::run_batch;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "satbench")]
#[command(about = "Benchmark external SAT solvers over a DIMACS CNF corpus", long_about = None)]
#[command(version)]
struct Cli {
    /// Run configuration file (JSON)
    #[arg(long, default_value = satbench_core::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Solver definition file (JSON)
    #[arg(long, default_value = satbench_core::DEFAULT_SOLVERS_FILE)]
    solvers: PathBuf,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Configuration problems are fatal before any trial runs.
    let config = ConfigLoader::new()
        .config_path(&cli.config)
        .solvers_path(&cli.solvers)
        .load()?;

    // Per-trial failures are recorded in the CSV, not surfaced here: the
    // batch exits 0 as long as orchestration itself succeeded.
    let summary = run_batch(&config).await?;
    println!("{summary}");

    Ok(())
}
