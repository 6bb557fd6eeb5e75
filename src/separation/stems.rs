//! Locating the stem files Demucs wrote
//!
//! Demucs owns its output layout. Current releases write
//! `<output>/<model>/<track>/<stem>.wav`; that is checked first, then the
//! output directory is searched for a folder named after the track.

use crate::types::StemPaths;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Extensions Demucs can write (`--mp3`, `--flac`, default wav)
const STEM_EXTENSIONS: [&str; 3] = ["wav", "mp3", "flac"];

/// Find the stems produced for `input`, if all four are present
pub fn locate_stems(output_dir: &Path, model: &str, input: &Path) -> Option<StemPaths> {
    let track = input.file_stem()?;

    let expected = output_dir.join(model).join(track);
    if let Some(stems) = stems_in(&expected) {
        return Some(stems);
    }

    debug!(
        "Stems not at {}, searching {}",
        expected.display(),
        output_dir.display()
    );

    WalkDir::new(output_dir)
        .max_depth(3)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir() && e.file_name() == track)
        .find_map(|e| stems_in(e.path()))
}

fn stems_in(dir: &Path) -> Option<StemPaths> {
    STEM_EXTENSIONS
        .iter()
        .map(|ext| StemPaths::in_dir(dir, ext))
        .find(StemPaths::all_exist)
}
