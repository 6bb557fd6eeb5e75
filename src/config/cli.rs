//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Default output directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "separated_stems";

/// Default Demucs model
pub const DEFAULT_MODEL: &str = "htdemucs";

/// CPU-only PyTorch wheel index
pub const TORCH_CPU_INDEX_URL: &str = "https://download.pytorch.org/whl/cpu";

/// song-splitter - Split a song into stems with Demucs
///
/// Splits an input song into vocals, drums, bass, and other instruments.
/// Installs Demucs and PyTorch on first use and requires FFmpeg on PATH.
#[derive(Parser, Debug)]
#[command(name = "song-splitter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Audio file to split
    #[arg(value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Directory for separated stems (created if missing)
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Demucs model name
    #[arg(short = 'n', long, value_name = "NAME", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Python interpreter used to install and run Demucs
    #[arg(long, value_name = "EXE", env = "SONG_SPLITTER_PYTHON")]
    pub python: Option<PathBuf>,

    /// Report missing Python packages instead of installing them
    #[arg(long, default_value = "false")]
    pub no_install: bool,

    /// Package index used when PyTorch has to be installed
    #[arg(long, value_name = "URL", default_value = TORCH_CPU_INDEX_URL)]
    pub torch_index_url: String,

    /// Write a JSON run report into the output directory
    #[arg(long, default_value = "false")]
    pub report: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Get the log filter directive based on verbosity flags
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
