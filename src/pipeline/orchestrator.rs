//! Pipeline orchestration
//!
//! Checks the environment, runs one Demucs separation and reports the
//! outcome. Environment problems abort the run; separation problems are
//! reported and swallowed.

use crate::config::Settings;
use crate::error::{Result, SplitterError};
use crate::export::{self, RunReport};
use crate::separation::{locate_stems, ProcessRunner, SeparationCommand, SystemRunner};
use crate::toolchain::{PackageSpec, SystemToolchain, Toolchain};
use crate::types::SeparationOutcome;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Media decoder Demucs needs for compressed formats
pub const DECODER_TOOL: &str = "ffmpeg";

/// Name the decoder is shown under in messages
pub const DECODER_NAME: &str = "FFmpeg";

/// Result of a completed run
#[derive(Debug)]
pub struct RunSummary {
    pub input: PathBuf,
    /// Command that was (or would have been) launched
    pub command: SeparationCommand,
    pub outcome: SeparationOutcome,
    /// Number of output lines relayed from the tool
    pub lines_relayed: usize,
}

/// Run the full pipeline against the real environment
pub fn run(settings: &Settings) -> Result<RunSummary> {
    let toolchain = SystemToolchain::new(&settings.python);
    run_with(settings, &toolchain, &SystemRunner)
}

/// Run the full pipeline with an explicit toolchain and process runner
///
/// Fails only for a missing input or an unusable environment; every
/// separation outcome comes back as `Ok`.
pub fn run_with(
    settings: &Settings,
    toolchain: &dyn Toolchain,
    runner: &dyn ProcessRunner,
) -> Result<RunSummary> {
    if !settings.input.exists() {
        return Err(SplitterError::InputNotFound(settings.input.clone()));
    }

    ensure_prerequisites(settings, toolchain)?;

    let summary = separate(settings, toolchain, runner);

    if settings.write_report {
        let path = settings.output_dir.join(export::REPORT_FILE_NAME);
        if let Err(e) = export::write_report(&RunReport::new(settings, &summary), &path) {
            warn!("Could not write run report: {}", e);
        }
    }

    Ok(summary)
}

/// Make sure Demucs, PyTorch and FFmpeg are usable
///
/// Missing Python packages are installed (unless disabled in settings) in
/// order: Demucs, then PyTorch from the configured index. A missing decoder
/// is fatal.
pub fn ensure_prerequisites(settings: &Settings, toolchain: &dyn Toolchain) -> Result<()> {
    let packages = [
        PackageSpec::demucs(),
        PackageSpec::torch(settings.torch_index_url.clone()),
    ];

    for spec in &packages {
        if toolchain.module_available(&spec.module) {
            debug!("Python module '{}' is available", spec.module);
            continue;
        }

        if !settings.auto_install {
            return Err(SplitterError::MissingPrerequisite {
                module: spec.module.clone(),
                package: spec.package.clone(),
            });
        }

        println!("Installing {} ...", spec.label);
        info!(
            "Python module '{}' missing, installing '{}' with {}",
            spec.module,
            spec.package,
            toolchain.interpreter().display()
        );
        toolchain.install(spec)?;
    }

    match toolchain.find_executable(DECODER_TOOL) {
        Some(path) => {
            debug!("Found {} at {}", DECODER_TOOL, path.display());
            Ok(())
        }
        None => Err(SplitterError::MissingDecoder {
            name: DECODER_NAME.to_string(),
        }),
    }
}

/// Run Demucs on the input and relay its output live
///
/// Never fails: every problem is printed and returned as an outcome.
pub fn separate(
    settings: &Settings,
    toolchain: &dyn Toolchain,
    runner: &dyn ProcessRunner,
) -> RunSummary {
    let command = SeparationCommand::demucs(
        toolchain.interpreter(),
        &settings.model,
        &settings.output_dir,
        &settings.input,
    );
    let mut lines_relayed = 0usize;

    let outcome = match std::fs::create_dir_all(&settings.output_dir) {
        Err(e) => {
            let err = SplitterError::output_error(&settings.output_dir, e);
            SeparationOutcome::Errored {
                reason: err.to_string(),
            }
        }
        Ok(()) => {
            let name = settings
                .input
                .file_name()
                .unwrap_or(settings.input.as_os_str())
                .to_string_lossy();
            println!();
            println!("Splitting: {}", name);
            info!("Running {}", command);

            let result = runner.run_streaming(&command, &mut |line| {
                lines_relayed += 1;
                println!("{}", line);
            });

            match result {
                Ok(Some(0)) => SeparationOutcome::Succeeded {
                    stems: locate_stems(&settings.output_dir, &settings.model, &settings.input),
                },
                Ok(code) => SeparationOutcome::Failed { code },
                Err(e) if e.kind() == ErrorKind::NotFound => SeparationOutcome::LaunchFailed {
                    reason: e.to_string(),
                },
                Err(e) => SeparationOutcome::Errored {
                    reason: e.to_string(),
                },
            }
        }
    };

    print_outcome(settings, &outcome);

    RunSummary {
        input: settings.input.clone(),
        command,
        outcome,
        lines_relayed,
    }
}

/// Print the user-facing result banner for an outcome
fn print_outcome(settings: &Settings, outcome: &SeparationOutcome) {
    println!();
    match outcome {
        SeparationOutcome::Succeeded { stems } => {
            let output_dir = settings
                .output_dir
                .canonicalize()
                .unwrap_or_else(|_| settings.output_dir.clone());
            println!("✓ Done! Separated stems saved in: {}", output_dir.display());
            if let Some(stems) = stems {
                for path in stems.iter() {
                    println!("  {}", path.display());
                }
            }
        }
        SeparationOutcome::Failed { code } => {
            warn!("demucs exited with {:?}", code);
            println!("✗ {}", SplitterError::SeparationFailed { code: *code });
        }
        SeparationOutcome::LaunchFailed { reason } => {
            println!(
                "✗ {}",
                SplitterError::SeparationLaunch {
                    reason: reason.clone()
                }
            );
        }
        SeparationOutcome::Errored { reason } => {
            println!("✗ Unexpected error while running demucs: {}", reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct StubToolchain {
        has_decoder: bool,
    }

    impl Toolchain for StubToolchain {
        fn interpreter(&self) -> &Path {
            Path::new("python3")
        }
        fn module_available(&self, _module: &str) -> bool {
            true
        }
        fn install(&self, _spec: &PackageSpec) -> Result<()> {
            Ok(())
        }
        fn find_executable(&self, name: &str) -> Option<PathBuf> {
            self.has_decoder.then(|| PathBuf::from("/usr/bin").join(name))
        }
    }

    struct StubRunner {
        result: Mutex<Option<io::Result<Option<i32>>>>,
    }

    impl StubRunner {
        fn new(result: io::Result<Option<i32>>) -> Self {
            Self {
                result: Mutex::new(Some(result)),
            }
        }
    }

    impl ProcessRunner for StubRunner {
        fn run_streaming(
            &self,
            _command: &SeparationCommand,
            on_line: &mut dyn FnMut(&str),
        ) -> io::Result<Option<i32>> {
            on_line("Separating track");
            on_line("100%|####|");
            self.result.lock().unwrap().take().unwrap_or(Ok(Some(0)))
        }
    }

    fn settings_in(dir: &Path) -> Settings {
        Settings {
            input: dir.join("song.mp3"),
            output_dir: dir.join("separated_stems"),
            ..Settings::default()
        }
    }

    #[test]
    fn test_missing_decoder_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = ensure_prerequisites(&settings_in(dir.path()), &StubToolchain { has_decoder: false })
            .unwrap_err();
        assert!(matches!(err, SplitterError::MissingDecoder { .. }));
        assert!(err.to_string().starts_with("FFmpeg not found in PATH."));
    }

    #[test]
    fn test_separate_success() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(dir.path());
        let summary = separate(
            &settings,
            &StubToolchain { has_decoder: true },
            &StubRunner::new(Ok(Some(0))),
        );
        assert!(summary.outcome.is_success());
        assert_eq!(summary.lines_relayed, 2);
        assert!(settings.output_dir.is_dir());
    }

    #[test]
    fn test_separate_nonzero_exit() {
        let dir = TempDir::new().unwrap();
        let summary = separate(
            &settings_in(dir.path()),
            &StubToolchain { has_decoder: true },
            &StubRunner::new(Ok(Some(1))),
        );
        assert_eq!(summary.outcome, SeparationOutcome::Failed { code: Some(1) });
    }

    #[test]
    fn test_separate_launch_failure() {
        let dir = TempDir::new().unwrap();
        let summary = separate(
            &settings_in(dir.path()),
            &StubToolchain { has_decoder: true },
            &StubRunner::new(Err(io::Error::from(io::ErrorKind::NotFound))),
        );
        assert!(matches!(summary.outcome, SeparationOutcome::LaunchFailed { .. }));
    }

    #[test]
    fn test_separate_other_io_error() {
        let dir = TempDir::new().unwrap();
        let summary = separate(
            &settings_in(dir.path()),
            &StubToolchain { has_decoder: true },
            &StubRunner::new(Err(io::Error::new(io::ErrorKind::Other, "pipe closed"))),
        );
        assert_eq!(
            summary.outcome,
            SeparationOutcome::Errored {
                reason: "pipe closed".to_string()
            }
        );
    }

    #[test]
    fn test_output_dir_blocked_by_file() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(dir.path());
        std::fs::write(&settings.output_dir, b"not a directory").unwrap();

        let summary = separate(
            &settings,
            &StubToolchain { has_decoder: true },
            &StubRunner::new(Ok(Some(0))),
        );
        assert!(matches!(summary.outcome, SeparationOutcome::Errored { .. }));
        assert_eq!(summary.lines_relayed, 0);
    }
}
