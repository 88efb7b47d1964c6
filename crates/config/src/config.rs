//! Centralized configuration for satbench
//!
//! [`Config`] is the single source of truth for a batch run. It is immutable
//! after construction and `Clone + Send + Sync`, so it can be shared freely
//! across worker tasks without synchronization.

use satbench_core::SolverSpec;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Immutable run configuration assembled by [`crate::ConfigLoader`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Configured input sources: individual CNF files or directories
    pub cnf_sources: Vec<PathBuf>,
    /// Per-trial wall-clock deadline
    pub timeout: Duration,
    /// Number of concurrently active trials
    pub max_workers: usize,
    /// Symmetry-breaking preprocessing, when enabled
    pub symmetry: Option<SymmetryBreaking>,
    /// Output CSV path for the result sink
    pub results_csv: PathBuf,
    /// Enabled solvers, shared by reference with every worker
    pub solvers: Vec<Arc<SolverSpec>>,
}

/// Symmetry-breaking settings carried over from the config file.
#[derive(Debug, Clone)]
pub struct SymmetryBreaking {
    /// Path to the symmetry breaker executable (e.g. BreakID)
    pub breaker_path: PathBuf,
    /// Ephemeral mode: write the transformed CNF to a temp file removed
    /// after the trial. Otherwise the file lands beside the input as
    /// `<stem>_sb.cnf` and stays for inspection.
    pub use_temp_files: bool,
}

/// On-disk shape of the run configuration file.
#[derive(Debug, Deserialize)]
pub(crate) struct RawConfig {
    pub cnf_files: Vec<PathBuf>,
    pub timeout: u64,
    pub maxthreads: usize,
    #[serde(default)]
    pub symmetry_breaking: Option<RawSymmetryBreaking>,
    #[serde(default)]
    pub results_csv: Option<PathBuf>,
}

/// On-disk shape of the `symmetry_breaking` object.
#[derive(Debug, Deserialize)]
pub(crate) struct RawSymmetryBreaking {
    pub enabled: bool,
    #[serde(default)]
    pub symmetry_breaker_path: Option<PathBuf>,
    #[serde(default)]
    pub use_temp_files: bool,
}
