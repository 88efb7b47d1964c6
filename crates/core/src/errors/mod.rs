//! Error handling for satbench
//!
//! All fallible operations in the workspace return [`Result`], with failure
//! modes centralized in the [`Error`] enum. Per-trial solver failures are
//! deliberately *not* errors: they are recorded as `TrialOutcome` values and
//! never cross the trial executor boundary as `Err`.

mod builders;
mod display;
mod types;

pub use types::{Error, Result};
