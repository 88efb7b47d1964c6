//! Work enumeration
//!
//! Pure expansion of configured input sources and solver definitions into
//! the ordered trial list. Directory sources expand to the regular files
//! directly inside them (non-recursive), sorted by path so that a given
//! configuration always produces the same request order.

use satbench_core::{Error, Result, SolverSpec, TrialRequest};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use walkdir::WalkDir;

/// Resolve the configured sources into the flat list of input files.
pub fn expand_inputs(sources: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for source in sources {
        if source.is_dir() {
            inputs.extend(files_in_directory(source)?);
        } else if source.is_file() {
            inputs.push(source.clone());
        } else {
            return Err(Error::configuration(format!(
                "input source '{}' does not exist",
                source.display()
            )));
        }
    }
    Ok(inputs)
}

fn files_in_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            Error::configuration(format!("failed to read directory '{}': {e}", dir.display()))
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Build the full cartesian (solver × input) request list, solver-major.
#[must_use]
pub fn build_requests(
    solvers: &[Arc<SolverSpec>],
    inputs: &[PathBuf],
    timeout: Duration,
) -> Vec<TrialRequest> {
    let mut requests = Vec::with_capacity(solvers.len() * inputs.len());
    for solver in solvers {
        for input in inputs {
            requests.push(TrialRequest {
                solver: Arc::clone(solver),
                input: input.clone(),
                timeout,
            });
        }
    }
    requests
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn solver(name: &str) -> Arc<SolverSpec> {
        Arc::new(SolverSpec {
            name: name.to_string(),
            path: PathBuf::from(format!("/bin/{name}")),
            args: vec![],
            env: Default::default(),
            enabled: true,
        })
    }

    #[test]
    fn directory_expansion_is_flat_and_sorted() {
        let dir = tempdir().unwrap();
        for name in ["c.cnf", "a.cnf", "b.cnf"] {
            fs::write(dir.path().join(name), "p cnf 0 0\n").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/d.cnf"), "p cnf 0 0\n").unwrap();

        let inputs = expand_inputs(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.cnf", "b.cnf", "c.cnf"]);
    }

    #[test]
    fn single_files_pass_through() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("only.cnf");
        fs::write(&file, "p cnf 0 0\n").unwrap();

        let inputs = expand_inputs(&[file.clone()]).unwrap();
        assert_eq!(inputs, vec![file]);
    }

    #[test]
    fn missing_source_is_a_configuration_error() {
        let err = expand_inputs(&[PathBuf::from("/nonexistent/corpus")]).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn requests_cover_the_cartesian_product() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.cnf");
        let b = dir.path().join("b.cnf");
        fs::write(&a, "").unwrap();
        fs::write(&b, "").unwrap();

        let solvers = [solver("s1"), solver("s2")];
        let requests = build_requests(
            &solvers,
            &[a.clone(), b.clone()],
            Duration::from_secs(5),
        );

        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].solver.name, "s1");
        assert_eq!(requests[0].input, a);
        assert_eq!(requests[3].solver.name, "s2");
        assert_eq!(requests[3].input, b);
    }
}
