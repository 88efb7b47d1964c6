//! Core domain types, errors, and constants for `satbench`.
//!
//! This crate establishes the foundational data structures and error handling
//! mechanisms used throughout the workspace.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias,
//!   centralizing all possible failure modes for predictable error handling.
//! - **`types`**: Contains the domain value types (`SolverSpec`,
//!   `TrialRequest`, `TrialOutcome`) that flow between the enumerator, the
//!   worker pool, and the result sink.
//! - **`constants`**: Shared static constants such as default file names and
//!   the solver exit-code conventions.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result},
    types::*,
};
