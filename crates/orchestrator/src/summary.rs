//! End-of-batch summary

use satbench_core::{TrialOutcome, TrialStatus};
use std::fmt;

/// Counts of terminal trial states for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: usize,
    pub timed_out: usize,
    pub failed: usize,
}

impl RunSummary {
    #[must_use]
    pub fn from_outcomes(outcomes: &[TrialOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome.status {
                TrialStatus::Completed => summary.completed += 1,
                TrialStatus::TimedOut => summary.timed_out += 1,
                TrialStatus::Failed => summary.failed += 1,
            }
        }
        summary
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.completed + self.timed_out + self.failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} trials: {} completed, {} timed out, {} failed",
            self.total(),
            self.completed,
            self.timed_out,
            self.failed
        )
    }
}
