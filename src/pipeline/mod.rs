//! Pipeline orchestration
//!
//! Coordinates prerequisite checks, the separation run and reporting.

mod orchestrator;

pub use orchestrator::{ensure_prerequisites, run, run_with, separate, RunSummary, DECODER_NAME, DECODER_TOOL};
