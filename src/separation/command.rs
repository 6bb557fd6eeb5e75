//! Separation command construction

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Python module that implements the separation CLI
pub const DEMUCS_MODULE: &str = "demucs";

/// A fully-built command line, kept as data until it is launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparationCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl SeparationCommand {
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(|a| a.as_ref().to_os_string()).collect(),
        }
    }

    /// `<python> -m demucs -n <model> -o <output_dir> <input>`
    pub fn demucs(python: &Path, model: &str, output_dir: &Path, input: &Path) -> Self {
        Self::new(
            python,
            [
                OsStr::new("-m"),
                OsStr::new(DEMUCS_MODULE),
                OsStr::new("-n"),
                OsStr::new(model),
                OsStr::new("-o"),
                output_dir.as_os_str(),
                input.as_os_str(),
            ],
        )
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> Vec<OsString> {
        std::iter::once(self.program.clone().into_os_string())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Lossy string form of [`argv`](Self::argv), for logs and reports
    pub fn argv_lossy(&self) -> Vec<String> {
        self.argv()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for SeparationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv_lossy().join(" "))
    }
}
