//! Configuration loader for satbench
//!
//! Handles all startup configuration in one place: reading the run
//! configuration and solver definition files, deserializing them, and
//! enforcing every pre-flight invariant so that nothing past this point can
//! fail for configuration reasons.

use crate::config::{Config, RawConfig, RawSymmetryBreaking, SymmetryBreaking};
use satbench_core::{Error, Result, SolverSpec, DEFAULT_RESULTS_CSV};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Builder-style loader producing an immutable [`Config`].
pub struct ConfigLoader {
    config_path: PathBuf,
    solvers_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader with the default file locations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_path: PathBuf::from(satbench_core::DEFAULT_CONFIG_FILE),
            solvers_path: PathBuf::from(satbench_core::DEFAULT_SOLVERS_FILE),
        }
    }

    /// Set the run configuration file path.
    #[must_use]
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Set the solver definition file path.
    #[must_use]
    pub fn solvers_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.solvers_path = path.into();
        self
    }

    /// Load and validate the configuration.
    pub fn load(self) -> Result<Config> {
        let raw = read_json::<RawConfig>(&self.config_path)?;
        let solvers = read_json::<Vec<SolverSpec>>(&self.solvers_path)?;
        build_config(raw, solvers)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).map_err(|e| Error::file_system(path, "read", e))?;
    serde_json::from_str(&contents).map_err(|e| Error::json(path, e.to_string()))
}

fn build_config(raw: RawConfig, solvers: Vec<SolverSpec>) -> Result<Config> {
    if raw.timeout == 0 {
        return Err(Error::configuration("timeout must be a positive number of seconds"));
    }
    if raw.maxthreads == 0 {
        return Err(Error::configuration("maxthreads must be at least 1"));
    }
    if raw.cnf_files.is_empty() {
        return Err(Error::configuration("cnf_files must name at least one file or directory"));
    }
    for source in &raw.cnf_files {
        if !source.exists() {
            return Err(Error::configuration(format!(
                "input source '{}' does not exist",
                source.display()
            )));
        }
    }

    let solvers = validate_solvers(solvers)?;
    let symmetry = raw.symmetry_breaking.map(build_symmetry).transpose()?.flatten();

    Ok(Config {
        cnf_sources: raw.cnf_files,
        timeout: Duration::from_secs(raw.timeout),
        max_workers: raw.maxthreads,
        symmetry,
        results_csv: raw
            .results_csv
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_CSV)),
        solvers,
    })
}

fn validate_solvers(solvers: Vec<SolverSpec>) -> Result<Vec<Arc<SolverSpec>>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut enabled = Vec::new();

    for solver in solvers {
        if solver.name.trim().is_empty() {
            return Err(Error::configuration("solver definitions must have a non-empty name"));
        }
        // Duplicate names would make CSV rows impossible to attribute.
        if !seen.insert(solver.name.clone()) {
            return Err(Error::configuration(format!(
                "duplicate solver name '{}'",
                solver.name
            )));
        }
        if solver.enabled {
            enabled.push(Arc::new(solver));
        }
    }

    if enabled.is_empty() {
        return Err(Error::configuration("no enabled solvers defined"));
    }
    Ok(enabled)
}

fn build_symmetry(raw: RawSymmetryBreaking) -> Result<Option<SymmetryBreaking>> {
    if !raw.enabled {
        return Ok(None);
    }
    let breaker_path = raw.symmetry_breaker_path.ok_or_else(|| {
        Error::configuration("symmetry_breaking.enabled requires symmetry_breaker_path")
    })?;
    if !breaker_path.is_file() {
        return Err(Error::configuration(format!(
            "symmetry breaker '{}' not found",
            breaker_path.display()
        )));
    }
    Ok(Some(SymmetryBreaking {
        breaker_path,
        use_temp_files: raw.use_temp_files,
    }))
}
