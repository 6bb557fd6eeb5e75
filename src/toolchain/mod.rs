//! External toolchain: Python packages and executables on PATH
//!
//! The orchestrator only talks to the [`Toolchain`] trait so tests can swap in
//! a fake environment. [`SystemToolchain`] is the real implementation.

pub mod path;
pub mod python;

use crate::error::Result;
use std::path::{Path, PathBuf};

pub use path::find_on_path;
pub use python::SystemToolchain;

/// A Python package the separation step depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// Import name probed with `importlib.util.find_spec`
    pub module: String,
    /// Requirement passed to `pip install`
    pub package: String,
    /// Alternate package index, if the package needs one
    pub index_url: Option<String>,
    /// Human-readable name for progress messages
    pub label: String,
}

impl PackageSpec {
    /// The source-separation library
    pub fn demucs() -> Self {
        Self {
            module: "demucs".to_string(),
            package: "demucs".to_string(),
            index_url: None,
            label: "demucs".to_string(),
        }
    }

    /// The numerical backend, installed from the given index
    pub fn torch(index_url: impl Into<String>) -> Self {
        Self {
            module: "torch".to_string(),
            package: "torch".to_string(),
            index_url: Some(index_url.into()),
            label: "PyTorch (CPU version)".to_string(),
        }
    }

    /// Arguments for `<python> -m pip install ...`
    pub fn pip_install_args(&self) -> Vec<String> {
        let mut args = vec![
            "-m".to_string(),
            "pip".to_string(),
            "install".to_string(),
            self.package.clone(),
        ];
        if let Some(url) = &self.index_url {
            args.push("--index-url".to_string());
            args.push(url.clone());
        }
        args
    }
}

/// Environment the orchestrator checks and, when allowed, remediates
pub trait Toolchain: Send + Sync {
    /// Interpreter used to run Python modules
    fn interpreter(&self) -> &Path;

    /// Check whether a Python module is resolvable without importing it
    fn module_available(&self, module: &str) -> bool;

    /// Install a package, failing if the installer exits non-zero
    fn install(&self, spec: &PackageSpec) -> Result<()>;

    /// Locate an executable on the system search path
    fn find_executable(&self, name: &str) -> Option<PathBuf>;
}
