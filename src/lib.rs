//! Asintota - empirical time-complexity analysis from profiler call traces
//!
//! Folds per-instance enter/exit event streams into per-call-path durations,
//! joins them with numeric instance properties, and fits a catalog of
//! single-parameter growth functions to each component to find the
//! (property, function) pair that best explains its running time.

pub mod aggregate;
pub mod call_path;
pub mod call_stack;
pub mod cli;
pub mod complexity;
pub mod csv_output;
pub mod event;
pub mod ingest;
pub mod instances;
pub mod join;
pub mod json_output;
pub mod pipeline;
pub mod stats;
pub mod text_output;
pub mod trace_folder;
