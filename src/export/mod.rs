//! Export module for run reports

pub mod json;

pub use json::{write_report, RunReport, REPORT_FILE_NAME};
