//! Executable lookup on the system search path

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Find `name` in the directories of a PATH-style variable
///
/// Returns the first candidate that is an executable file. On Windows each
/// `PATHEXT` extension is tried when `name` has none.
pub fn find_on_path(name: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let path_var = path_var?;

    for dir in std::env::split_paths(path_var) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        for candidate in candidate_names(name) {
            let path = dir.join(&candidate);
            if is_executable(&path) {
                return Some(path);
            }
        }
    }
    None
}

#[cfg(windows)]
fn candidate_names(name: &str) -> Vec<String> {
    if Path::new(name).extension().is_some() {
        return vec![name.to_string()];
    }
    let exts = std::env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
    let mut names = vec![name.to_string()];
    names.extend(
        exts.split(';')
            .filter(|ext| !ext.is_empty())
            .map(|ext| format!("{}{}", name, ext.to_lowercase())),
    );
    names
}

#[cfg(not(windows))]
fn candidate_names(name: &str) -> Vec<String> {
    vec![name.to_string()]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
