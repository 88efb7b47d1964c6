//! Core error type definitions

use std::path::PathBuf;
use std::time::Duration;

/// Result type alias for satbench operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for satbench operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad or missing configuration, input paths, or solver definitions.
    /// Always fatal and always raised before any trial runs.
    Configuration { message: String },

    /// JSON deserialization errors for config and solver definition files
    Json { path: PathBuf, message: String },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Subprocess invocation errors (solver or symmetry breaker). These are
    /// converted into `TrialOutcome` values inside the trial executor and
    /// never propagate out of it.
    CommandExecution {
        command: String,
        args: Vec<String>,
        message: String,
        exit_code: Option<i32>,
    },

    /// Operation exceeded its wall-clock deadline
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Result sink append failed after bounded retries. Fatal: silent data
    /// loss is unacceptable.
    SinkWrite { path: PathBuf, message: String },

    /// Broken runtime invariants (poisoned locks, crashed worker tasks).
    /// Not user-correctable.
    Internal { message: String },
}
