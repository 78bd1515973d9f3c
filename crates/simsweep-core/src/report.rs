//! Serializable record of a completed batch.

use crate::artifact::ResultArtifactPath;
use crate::error::{BatchError, BatchResult};
use crate::invoker::RunOutcome;
use crate::janitor::CleanupOutcome;
use crate::tally::BatchTally;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of a complete batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Unique id for this batch.
    pub batch_id: String,

    /// Digest of the ordered sweep.
    pub sweep_digest: String,

    /// Pre-batch cleanup result.
    pub cleanup: CleanupOutcome,

    /// One outcome per parameter point, in sweep order.
    pub outcomes: Vec<RunOutcome>,

    pub tally: BatchTally,

    pub artifact: ResultArtifactPath,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    /// Whether every run succeeded.
    pub fn success(&self) -> bool {
        self.tally.all_succeeded()
    }

    /// Process exit code for enclosing automation: 0 on full success, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.success() {
            0
        } else {
            1
        }
    }

    /// Failed outcomes, in sweep order.
    pub fn failures(&self) -> impl Iterator<Item = &RunOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    pub fn duration_ms(&self) -> u64 {
        (self.finished_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> BatchResult<()> {
        let bytes = serde_json::to_vec_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| BatchError::Report {
                path: path.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, bytes).map_err(|source| BatchError::Report {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::{FailureCause, RunStatus};
    use crate::sweep::ParameterPoint;

    fn report(failed: usize) -> BatchReport {
        let now = Utc::now();
        let outcomes = (1..=2)
            .map(|i| {
                let ok = i > failed;
                RunOutcome {
                    index: i,
                    point: ParameterPoint::new(10 * i as u64, 10),
                    status: if ok { RunStatus::Succeeded } else { RunStatus::Failed },
                    exit_code: Some(if ok { 0 } else { 2 }),
                    stdout: String::new(),
                    stderr: if ok { String::new() } else { "boom".to_string() },
                    duration_ms: 3,
                    failure: (!ok).then_some(FailureCause::NonZeroExit { code: Some(2) }),
                }
            })
            .collect();
        BatchReport {
            batch_id: "batch-1".to_string(),
            sweep_digest: "abc".to_string(),
            cleanup: CleanupOutcome::default(),
            outcomes,
            tally: BatchTally {
                total: 2,
                succeeded: 2 - failed,
                failed,
            },
            artifact: ResultArtifactPath::default(),
            started_at: now,
            finished_at: now,
        }
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(report(0).exit_code(), 0);
        assert_eq!(report(1).exit_code(), 1);
        assert_eq!(report(1).failures().count(), 1);
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("report.json");
        report(1).write_json(&path).expect("write");

        let value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).expect("read")).expect("parse");
        assert_eq!(value["tally"]["failed"], 1);
        assert_eq!(value["outcomes"][0]["status"], "failed");
        assert_eq!(value["outcomes"][0]["failure"]["cause"], "non_zero_exit");
    }
}
