//! Symmetry-breaking preprocessing step
//!
//! Invokes an external symmetry breaker (e.g. BreakID) as
//! `<breaker> <input.cnf> <output.cnf>` ahead of the solver. The transformed
//! file either lands in a temp file that is removed once the trial finishes
//! (ephemeral mode) or beside the input as `<stem>_sb.cnf` (persistent mode).

use crate::process::{drain_output, ProcessGuard, WaitOutcome};
use satbench_core::{Error, Result, SYMMETRY_BREAK_SUFFIX};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::NamedTempFile;

/// Runs the configured symmetry breaker against CNF inputs.
#[derive(Debug, Clone)]
pub struct SymmetryBreaker {
    breaker_path: PathBuf,
    use_temp_files: bool,
}

/// A successfully transformed CNF. Holding this value keeps an ephemeral
/// output alive; dropping it removes the temp file. Persistent outputs are
/// left in place.
#[derive(Debug)]
pub struct BrokenCnf {
    path: PathBuf,
    /// Breaker-reported processing time, summed from its `T:` output lines
    pub break_time: f64,
    temp: Option<NamedTempFile>,
}

impl BrokenCnf {
    /// Path of the transformed CNF to hand to the solver.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this output disappears when the value is dropped.
    #[must_use]
    pub fn is_ephemeral(&self) -> bool {
        self.temp.is_some()
    }
}

impl SymmetryBreaker {
    #[must_use]
    pub fn new(breaker_path: impl Into<PathBuf>, use_temp_files: bool) -> Self {
        Self {
            breaker_path: breaker_path.into(),
            use_temp_files,
        }
    }

    /// Transform `input`, bounded by `timeout`. Any failure (spawn error,
    /// non-zero exit, deadline expiry) is an `Err`; the caller records it as
    /// a failed trial and skips the solver.
    pub async fn run(&self, input: &Path, timeout: Duration) -> Result<BrokenCnf> {
        let (output_path, temp) = if self.use_temp_files {
            let temp = tempfile::Builder::new()
                .prefix("satbench_")
                .suffix(".cnf")
                .tempfile()
                .map_err(|e| Error::file_system("<tempdir>", "create temp file", e))?;
            (temp.path().to_path_buf(), Some(temp))
        } else {
            (persistent_output_path(input), None)
        };

        let mut child = Command::new(&self.breaker_path)
            .arg(input)
            .arg(&output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::command_execution(
                    self.breaker_path.display().to_string(),
                    vec![input.display().to_string(), output_path.display().to_string()],
                    format!("failed to start symmetry breaker: {e}"),
                    None,
                )
            })?;

        let (stdout_handle, stderr_handle) = drain_output(&mut child);
        let guard = ProcessGuard::new(child, timeout);

        match guard.wait_with_timeout().await? {
            WaitOutcome::Exited(status) => {
                let stdout = stdout_handle.join().unwrap_or_default();
                let stderr = stderr_handle.join().unwrap_or_default();

                if !status.success() {
                    // Do not leave a half-written persistent output around.
                    if temp.is_none() {
                        let _ = fs::remove_file(&output_path);
                    }
                    return Err(Error::command_execution(
                        self.breaker_path.display().to_string(),
                        vec![input.display().to_string()],
                        stderr.trim().to_string(),
                        status.code(),
                    ));
                }

                Ok(BrokenCnf {
                    path: output_path,
                    break_time: parse_break_time(&stdout),
                    temp,
                })
            }
            WaitOutcome::TimedOut => {
                if temp.is_none() {
                    let _ = fs::remove_file(&output_path);
                }
                Err(Error::timeout("symmetry breaking", timeout))
            }
        }
    }
}

/// `problem.cnf` -> `problem_sb.cnf`, beside the input.
fn persistent_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{SYMMETRY_BREAK_SUFFIX}{extension}"))
}

/// Sum the decimal values on BreakID's `T: <secs>` timing lines.
fn parse_break_time(stdout: &str) -> f64 {
    let mut total = 0.0;
    for line in stdout.lines() {
        let Some(idx) = line.find("T:") else { continue };
        let value = line[idx + 2..]
            .split_whitespace()
            .find_map(|token| token.contains('.').then(|| token.parse::<f64>().ok()).flatten());
        if let Some(value) = value {
            total += value;
        }
    }
    total
}
