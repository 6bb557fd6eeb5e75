//! Python-backed toolchain: module probes and pip installs

use super::{find_on_path, PackageSpec, Toolchain};
use crate::error::{Result, SplitterError};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Probe script: exits 0 when the module named in argv[1] can be found.
/// `find_spec` locates the module without executing it.
const FIND_SPEC_PROBE: &str = r#"
import sys
from importlib.util import find_spec
try:
    found = find_spec(sys.argv[1]) is not None
except Exception:
    found = False
sys.exit(0 if found else 1)
"#;

/// Toolchain backed by a real Python interpreter and the process PATH
#[derive(Debug, Clone)]
pub struct SystemToolchain {
    python: PathBuf,
}

impl SystemToolchain {
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
        }
    }
}

impl Toolchain for SystemToolchain {
    fn interpreter(&self) -> &Path {
        &self.python
    }

    fn module_available(&self, module: &str) -> bool {
        let output = Command::new(&self.python)
            .args(["-c", FIND_SPEC_PROBE, module])
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) => {
                debug!(
                    "find_spec({}) via {} -> {:?}",
                    module,
                    self.python.display(),
                    output.status.code()
                );
                output.status.success()
            }
            Err(e) => {
                warn!("Could not run {} to probe '{}': {}", self.python.display(), module, e);
                false
            }
        }
    }

    fn install(&self, spec: &PackageSpec) -> Result<()> {
        let args = spec.pip_install_args();
        info!("Running {} {}", self.python.display(), args.join(" "));

        // pip output is inherited so download progress stays visible
        let status = Command::new(&self.python)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| SplitterError::InstallFailed {
                package: spec.package.clone(),
                reason: format!("could not run {}: {}", self.python.display(), e),
            })?;

        if status.success() {
            info!("Installed {}", spec.package);
            Ok(())
        } else {
            Err(SplitterError::install_failed(&spec.package, status.code()))
        }
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        let path_var = std::env::var_os("PATH");
        find_on_path(name, path_var.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING_PYTHON: &str = "/nonexistent/song-splitter-test/python3";

    #[test]
    fn test_probe_with_missing_interpreter_is_unavailable() {
        let toolchain = SystemToolchain::new(MISSING_PYTHON);
        assert!(!toolchain.module_available("demucs"));
    }

    #[test]
    fn test_install_with_missing_interpreter_fails() {
        let toolchain = SystemToolchain::new(MISSING_PYTHON);
        let err = toolchain.install(&PackageSpec::demucs()).unwrap_err();
        match err {
            SplitterError::InstallFailed { package, reason } => {
                assert_eq!(package, "demucs");
                assert!(reason.contains("could not run"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_interpreter() {
        let toolchain = SystemToolchain::new("python3");
        assert_eq!(toolchain.interpreter(), Path::new("python3"));
    }
}
