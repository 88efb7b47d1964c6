//! Trial execution for satbench
//!
//! This crate owns everything about running one trial: spawning the solver
//! subprocess (optionally behind a symmetry-breaking preprocessing step),
//! enforcing the wall-clock timeout with a process-group kill, capturing
//! output, and parsing solver statistics.
//!
//! The central contract lives on [`TrialRunner::run`]: it never returns an
//! error. Every failure mode of a trial, from a missing executable to a
//! breaker crash to a deadline expiry, is folded into the returned
//! `TrialOutcome` so that one broken solver can never abort a batch.

pub mod breaker;
pub mod monitor;
pub mod parse;
pub mod process;
pub mod runner;

pub use breaker::{BrokenCnf, SymmetryBreaker};
pub use monitor::ResourceUsage;
pub use process::{ProcessGuard, WaitOutcome};
pub use runner::TrialRunner;
