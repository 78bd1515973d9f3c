//! Pre-batch removal of a stale aggregate result file.

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;

/// What happened when cleaning up the result artifact.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CleanupOutcome {
    /// A file existed and was deleted.
    pub removed: bool,

    /// Cause of a failed removal. Never fatal to the batch.
    pub warning: Option<String>,
}

impl CleanupOutcome {
    fn absent() -> Self {
        Self::default()
    }

    fn removed() -> Self {
        Self {
            removed: true,
            warning: None,
        }
    }

    fn failed(cause: String) -> Self {
        Self {
            removed: false,
            warning: Some(cause),
        }
    }
}

/// Deletes the aggregate result file so batches never mix results.
pub struct ResultFileJanitor;

impl ResultFileJanitor {
    /// Remove `path` if it exists.
    ///
    /// An absent file is not an error, including one that disappears between
    /// the check and the removal. Any other failure is returned as a warning.
    pub fn cleanup(path: &Path) -> CleanupOutcome {
        match std::fs::symlink_metadata(path) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return CleanupOutcome::absent(),
            Err(e) => return CleanupOutcome::failed(e.to_string()),
        }

        match std::fs::remove_file(path) {
            Ok(()) => CleanupOutcome::removed(),
            Err(e) if e.kind() == ErrorKind::NotFound => CleanupOutcome::absent(),
            Err(e) => CleanupOutcome::failed(e.to_string()),
        }
    }
}
