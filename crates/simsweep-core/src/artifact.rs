//! Location of the aggregate result file written by the simulation.
//!
//! The orchestrator never opens this file. It only removes a stale copy before
//! a batch and reports where the new one lives afterwards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default results directory inside the simulation container.
pub const DEFAULT_RESULTS_DIR: &str = "/ns3/results";

/// Default aggregate result file name.
pub const DEFAULT_RESULTS_FILE: &str = "wifi-simple-results.csv";

/// Where the external executable writes its aggregate CSV.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultArtifactPath {
    /// Directory the executable writes results into.
    pub results_dir: PathBuf,

    /// File name of the aggregate CSV.
    pub file_name: String,

    /// Same directory as seen from outside the container, if different.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_dir: Option<PathBuf>,
}

impl Default for ResultArtifactPath {
    fn default() -> Self {
        Self::new(DEFAULT_RESULTS_DIR, DEFAULT_RESULTS_FILE)
    }
}

impl ResultArtifactPath {
    pub fn new(results_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            results_dir: results_dir.into(),
            file_name: file_name.into(),
            host_dir: None,
        }
    }

    pub fn with_host_dir(mut self, host_dir: impl Into<PathBuf>) -> Self {
        self.host_dir = Some(host_dir.into());
        self
    }

    /// Full path of the artifact. A relative results directory is taken
    /// relative to the current working directory.
    pub fn resolve(&self) -> PathBuf {
        absolutize(&self.results_dir.join(&self.file_name))
    }

    /// Host-visible results directory, resolved the same way.
    pub fn host_location(&self) -> Option<PathBuf> {
        self.host_dir.as_deref().map(absolutize)
    }
}

/// `path` made absolute against the current working directory.
pub(crate) fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
