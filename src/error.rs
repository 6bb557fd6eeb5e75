//! Unified error types for song-splitter
//!
//! Error strategy:
//! - Invocation errors (no input, missing file): exit 1 before touching anything
//! - Environment errors (decoder missing, install failed): fatal, exit 2
//! - Separation errors: reported by the orchestrator, never escalated
//!
//! All errors include actionable suggestions where possible.

use std::path::PathBuf;
use thiserror::Error;

/// Usage line printed when no input is given
pub const USAGE: &str = "Usage: song-splitter <path_to_song.mp3>";

/// Manual installation guidance for the decoder tool
pub const DECODER_INSTALL_HINT: &str = "Please install FFmpeg manually:\n - Windows: choco install ffmpeg  (or download from ffmpeg.org)\n - Linux: sudo apt install ffmpeg\n - macOS: brew install ffmpeg";

/// Top-level error type for song-splitter operations
#[derive(Debug, Error)]
pub enum SplitterError {
    // =========================================================================
    // Invocation errors - exit 1, no side effects
    // =========================================================================
    #[error("{USAGE}")]
    Usage,

    #[error("File not found: {}\n  Tip: Check the path is correct and accessible", .0.display())]
    InputNotFound(PathBuf),

    // =========================================================================
    // Environment errors - abort before separation
    // =========================================================================
    #[error("{name} not found in PATH.\n{DECODER_INSTALL_HINT}")]
    MissingDecoder { name: String },

    #[error("Python module '{module}' is not available and automatic installation is disabled\n  Tip: Install it yourself with: pip install {package}")]
    MissingPrerequisite { module: String, package: String },

    #[error("Failed to install {package}: {reason}\n  Tip: Check your network connection and that pip works for this interpreter")]
    InstallFailed { package: String, reason: String },

    // =========================================================================
    // Separation errors - reported, never escalated
    // =========================================================================
    #[error("Failed to run demucs. Is it installed and available as a module? {reason}")]
    SeparationLaunch { reason: String },

    #[error("Error during Demucs run ({}). Please check above logs.", describe_exit(.code))]
    SeparationFailed { code: Option<i32> },

    #[error("Cannot write output to '{path}': {reason}\n  Tip: Check write permissions for the output directory")]
    OutputError { path: PathBuf, reason: String },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Result type alias for song-splitter operations
pub type Result<T> = std::result::Result<T, SplitterError>;

impl SplitterError {
    /// Returns true if the invocation itself was wrong (no input, missing file)
    pub fn is_usage_error(&self) -> bool {
        matches!(self, SplitterError::Usage | SplitterError::InputNotFound(_))
    }

    /// Returns true if the environment cannot run a separation at all
    pub fn is_environment_error(&self) -> bool {
        matches!(
            self,
            SplitterError::MissingDecoder { .. }
                | SplitterError::MissingPrerequisite { .. }
                | SplitterError::InstallFailed { .. }
        )
    }

    /// Process exit code for an error that reaches the entry point
    pub fn exit_code(&self) -> u8 {
        if self.is_usage_error() {
            1
        } else {
            2
        }
    }

    /// Create an install error from a pip exit status
    pub fn install_failed(package: impl Into<String>, code: Option<i32>) -> Self {
        let reason = match code {
            Some(code) => format!("pip exited with status {}", code),
            None => "pip was terminated by a signal".to_string(),
        };
        SplitterError::InstallFailed {
            package: package.into(),
            reason,
        }
    }

    /// Create an output error, checking for common issues
    pub fn output_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!("Permission denied. Check that you have write access to {}", path.display())
            }
            std::io::ErrorKind::NotFound => {
                format!("Directory does not exist: {}", path.parent().map(|p| p.display().to_string()).unwrap_or_default())
            }
            _ => err.to_string(),
        };
        SplitterError::OutputError { path, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_errors_exit_one() {
        assert_eq!(SplitterError::Usage.exit_code(), 1);
        assert_eq!(SplitterError::InputNotFound(PathBuf::from("song.mp3")).exit_code(), 1);
    }

    #[test]
    fn test_environment_errors_exit_two() {
        let missing = SplitterError::MissingDecoder { name: "FFmpeg".to_string() };
        assert!(missing.is_environment_error());
        assert_eq!(missing.exit_code(), 2);

        let install = SplitterError::install_failed("demucs", Some(1));
        assert!(install.is_environment_error());
        assert_eq!(install.exit_code(), 2);
    }

    #[test]
    fn test_missing_decoder_message_has_guidance() {
        let msg = SplitterError::MissingDecoder { name: "FFmpeg".to_string() }.to_string();
        assert!(msg.starts_with("FFmpeg not found in PATH.\n"));
        assert!(msg.contains("choco install ffmpeg"));
        assert!(msg.contains("sudo apt install ffmpeg"));
        assert!(msg.contains("brew install ffmpeg"));
    }

    #[test]
    fn test_separation_errors_are_not_environment_errors() {
        let launch = SplitterError::SeparationLaunch { reason: "not found".to_string() };
        assert!(!launch.is_environment_error());
        assert!(!SplitterError::SeparationFailed { code: Some(1) }.is_environment_error());
        assert!(!SplitterError::Usage.is_environment_error());

        let prerequisite = SplitterError::MissingPrerequisite {
            module: "demucs".to_string(),
            package: "demucs".to_string(),
        };
        assert!(prerequisite.is_environment_error());
    }

    #[test]
    fn test_install_failed_reason() {
        let msg = SplitterError::install_failed("torch", Some(3)).to_string();
        assert!(msg.contains("torch"));
        assert!(msg.contains("status 3"));

        let msg = SplitterError::install_failed("torch", None).to_string();
        assert!(msg.contains("signal"));
    }

    #[test]
    fn test_separation_failed_message() {
        let msg = SplitterError::SeparationFailed { code: Some(1) }.to_string();
        assert!(msg.contains("exit status 1"));
        let msg = SplitterError::SeparationFailed { code: None }.to_string();
        assert!(msg.contains("signal"));
    }

    #[test]
    fn test_output_error_permission_hint() {
        let err = SplitterError::output_error(
            "/root/out",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(err.to_string().contains("Permission denied"));
        assert!(!err.is_usage_error());
    }
}
