//! Separation module
//!
//! Builds the Demucs command line, runs it with live output relay and
//! locates the stems it wrote.

pub mod command;
pub mod runner;
pub mod stems;

pub use command::{SeparationCommand, DEMUCS_MODULE};
pub use runner::{ProcessRunner, SystemRunner};
pub use stems::locate_stems;
