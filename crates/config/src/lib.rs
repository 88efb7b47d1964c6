//! Configuration parsing and validation for satbench
//!
//! This crate loads the run configuration file and the solver definition
//! file (both JSON), validates them, and produces the immutable [`Config`]
//! value the rest of the system is driven by.

pub mod config;
pub mod loader;

pub use config::{Config, SymmetryBreaking};
pub use loader::ConfigLoader;
