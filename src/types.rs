//! Core data types for song-splitter
//!
//! These types carry the result of a run from the orchestrator to the
//! entry point and the run report.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Names of the four stems Demucs produces, in output order
pub const STEM_NAMES: [&str; 4] = ["vocals", "drums", "bass", "other"];

/// Paths to the separated stem files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StemPaths {
    pub vocals: PathBuf,
    pub drums: PathBuf,
    pub bass: PathBuf,
    pub other: PathBuf,
}

impl StemPaths {
    /// Stem files inside `dir` with the given extension
    pub fn in_dir(dir: &Path, extension: &str) -> Self {
        let file = |name: &str| dir.join(format!("{}.{}", name, extension));
        Self {
            vocals: file("vocals"),
            drums: file("drums"),
            bass: file("bass"),
            other: file("other"),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        [&self.vocals, &self.drums, &self.bass, &self.other].into_iter()
    }

    /// True when every stem file exists on disk
    pub fn all_exist(&self) -> bool {
        self.iter().all(|p| p.is_file())
    }
}

/// How a separation attempt ended
///
/// Every variant is a handled outcome: the entry point still exits 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeparationOutcome {
    /// The tool exited 0; stems are listed when they could be located
    Succeeded { stems: Option<StemPaths> },
    /// The tool ran and exited non-zero (`None` when killed by a signal)
    Failed { code: Option<i32> },
    /// The tool could not be started
    LaunchFailed { reason: String },
    /// Anything else that went wrong around the run
    Errored { reason: String },
}

impl SeparationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SeparationOutcome::Succeeded { .. })
    }

    /// Exit code of the separation tool, if it ran to completion
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            SeparationOutcome::Succeeded { .. } => Some(0),
            SeparationOutcome::Failed { code } => *code,
            _ => None,
        }
    }

    /// Short machine-friendly name used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            SeparationOutcome::Succeeded { .. } => "succeeded",
            SeparationOutcome::Failed { .. } => "failed",
            SeparationOutcome::LaunchFailed { .. } => "launch_failed",
            SeparationOutcome::Errored { .. } => "errored",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_paths_in_dir() {
        let stems = StemPaths::in_dir(Path::new("out/htdemucs/song"), "wav");
        assert_eq!(stems.vocals, PathBuf::from("out/htdemucs/song/vocals.wav"));
        assert_eq!(stems.other, PathBuf::from("out/htdemucs/song/other.wav"));
        assert_eq!(stems.iter().count(), STEM_NAMES.len());
    }

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(SeparationOutcome::Succeeded { stems: None }.exit_code(), Some(0));
        assert_eq!(SeparationOutcome::Failed { code: Some(2) }.exit_code(), Some(2));
        assert_eq!(
            SeparationOutcome::LaunchFailed { reason: "nope".into() }.exit_code(),
            None
        );
        assert!(!SeparationOutcome::Failed { code: None }.is_success());
    }
}
