//! JSON run report

use crate::config::Settings;
use crate::error::{Result, SplitterError};
use crate::pipeline::RunSummary;
use crate::types::SeparationOutcome;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// JSON output schema version
const SCHEMA_VERSION: &str = "1.0";

/// Report file name, written inside the output directory
pub const REPORT_FILE_NAME: &str = "song_splitter.json";

/// Top-level JSON report structure
#[derive(Debug, Serialize, Deserialize)]
pub struct RunReport {
    /// Schema version for forward compatibility
    pub version: String,
    /// song-splitter version that generated this file
    pub generator_version: String,
    /// Timestamp of the run
    pub finished_at: String,
    pub input: String,
    pub model: String,
    pub output_dir: String,
    /// Exact command line that was launched
    pub command: Vec<String>,
    pub outcome: OutcomeJson,
    /// Number of output lines relayed from the tool
    pub lines_relayed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeJson {
    /// One of `succeeded`, `failed`, `launch_failed`, `errored`
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stems: Option<StemsJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StemsJson {
    pub vocals: String,
    pub drums: String,
    pub bass: String,
    pub other: String,
}

impl RunReport {
    pub fn new(settings: &Settings, summary: &RunSummary) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            finished_at: chrono::Utc::now().to_rfc3339(),
            input: summary.input.to_string_lossy().to_string(),
            model: settings.model.clone(),
            output_dir: settings.output_dir.to_string_lossy().to_string(),
            command: summary.command.argv_lossy(),
            outcome: outcome_to_json(&summary.outcome),
            lines_relayed: summary.lines_relayed,
        }
    }
}

fn outcome_to_json(outcome: &SeparationOutcome) -> OutcomeJson {
    let (reason, stems) = match outcome {
        SeparationOutcome::Succeeded { stems } => (None, stems.as_ref()),
        SeparationOutcome::Failed { .. } => (None, None),
        SeparationOutcome::LaunchFailed { reason } | SeparationOutcome::Errored { reason } => {
            (Some(reason.clone()), None)
        }
    };

    OutcomeJson {
        kind: outcome.kind().to_string(),
        exit_code: outcome.exit_code(),
        reason,
        stems: stems.map(|s| StemsJson {
            vocals: s.vocals.to_string_lossy().to_string(),
            drums: s.drums.to_string_lossy().to_string(),
            bass: s.bass.to_string_lossy().to_string(),
            other: s.other.to_string_lossy().to_string(),
        }),
    }
}

/// Write a run report to a JSON file
///
/// Uses atomic write pattern: writes to a temp file first, then renames.
pub fn write_report(report: &RunReport, output_path: &Path) -> Result<()> {
    let temp_path = output_path.with_extension("json.tmp");

    let file = File::create(&temp_path).map_err(|e| SplitterError::output_error(output_path, e))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        SplitterError::OutputError {
            path: output_path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    std::fs::rename(&temp_path, output_path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        SplitterError::OutputError {
            path: output_path.to_path_buf(),
            reason: format!("Failed to finalize file: {}", e),
        }
    })?;

    info!("Wrote run report to {}", output_path.display());

    Ok(())
}
