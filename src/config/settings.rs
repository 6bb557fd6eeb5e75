//! Runtime configuration settings

use super::cli::{Cli, DEFAULT_MODEL, DEFAULT_OUTPUT_DIR, TORCH_CPU_INDEX_URL};
use crate::error::{Result, SplitterError};
use std::path::PathBuf;

/// Runtime settings for a separation run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Audio file to split
    pub input: PathBuf,
    /// Output directory for stems
    pub output_dir: PathBuf,
    /// Demucs model name
    pub model: String,
    /// Python interpreter
    pub python: PathBuf,
    /// Install missing Python packages
    pub auto_install: bool,
    /// Index URL for the PyTorch install
    pub torch_index_url: String,
    /// Write a JSON run report
    pub write_report: bool,
}

impl Settings {
    /// Create settings from CLI arguments
    ///
    /// Fails with [`SplitterError::Usage`] when no input path was given.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let input = cli.input.clone().ok_or(SplitterError::Usage)?;

        Ok(Self {
            input,
            output_dir: cli.output.clone(),
            model: cli.model.clone(),
            python: cli.python.clone().unwrap_or_else(system_python),
            auto_install: !cli.no_install,
            torch_index_url: cli.torch_index_url.clone(),
            write_report: cli.report,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            model: DEFAULT_MODEL.to_string(),
            python: system_python(),
            auto_install: true,
            torch_index_url: TORCH_CPU_INDEX_URL.to_string(),
            write_report: false,
        }
    }
}

/// Python command name for the current OS
pub fn system_python() -> PathBuf {
    if cfg!(target_os = "windows") {
        PathBuf::from("python")
    } else {
        PathBuf::from("python3")
    }
}
