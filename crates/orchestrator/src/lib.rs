//! Batch orchestration for satbench
//!
//! Expands configured input sources and solver definitions into the full
//! cartesian set of trials, fans them out over a bounded pool of workers,
//! and streams every outcome into the append-only CSV sink. The engine is
//! pure scheduling: it holds no solver-specific logic, and a failing or
//! timed-out trial never aborts its siblings.

pub mod batch;
pub mod engine;
pub mod enumerate;
pub mod sink;
pub mod summary;

pub use batch::run_batch;
pub use engine::Orchestrator;
pub use enumerate::{build_requests, expand_inputs};
pub use sink::CsvSink;
pub use summary::RunSummary;
