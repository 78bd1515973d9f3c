//! Batch orchestration: cleanup, then every run in sweep order, then summary.

use crate::config::BatchConfig;
use crate::error::{BatchError, BatchResult};
use crate::invoker::RunInvoker;
use crate::janitor::ResultFileJanitor;
use crate::logger::BatchLogger;
use crate::obs;
use crate::report::BatchReport;
use crate::summary::{rule, SummaryReporter};
use crate::tally::BatchTally;
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Driver lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BatchState {
    NotStarted,
    CleaningUp,
    Running { index: usize },
    Completed,
}

impl BatchState {
    fn rank(&self) -> (u8, usize) {
        match self {
            BatchState::NotStarted => (0, 0),
            BatchState::CleaningUp => (1, 0),
            BatchState::Running { index } => (2, *index),
            BatchState::Completed => (3, 0),
        }
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchState::NotStarted => write!(f, "not_started"),
            BatchState::CleaningUp => write!(f, "cleaning_up"),
            BatchState::Running { index } => write!(f, "running({})", index),
            BatchState::Completed => write!(f, "completed"),
        }
    }
}

/// Runs one batch over a fixed sweep.
///
/// Runs execute strictly one after another; a failed run never stops the
/// sweep. Only an unexpected invocation error aborts it early.
pub struct BatchDriver {
    config: BatchConfig,
    logger: Arc<dyn BatchLogger>,
    state: BatchState,
}

impl BatchDriver {
    pub fn new(config: BatchConfig, logger: Arc<dyn BatchLogger>) -> Self {
        Self {
            config,
            logger,
            state: BatchState::NotStarted,
        }
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    fn advance(&mut self, next: BatchState) {
        debug_assert!(
            next.rank() > self.state.rank(),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = %self.state, to = %next, "batch state transition");
        self.state = next;
    }

    /// Execute the whole batch. A driver runs at most once.
    pub async fn run(&mut self) -> BatchResult<BatchReport> {
        if self.state != BatchState::NotStarted {
            return Err(BatchError::AlreadyStarted {
                state: self.state.to_string(),
            });
        }

        let batch_id = Uuid::new_v4().to_string();
        let span = obs::batch_span(&batch_id);
        self.execute(batch_id).instrument(span).await
    }

    async fn execute(&mut self, batch_id: String) -> BatchResult<BatchReport> {
        let started_at = Utc::now();
        let sweep_digest = self.config.sweep.digest();
        let total = self.config.sweep.len();
        let logger = Arc::clone(&self.logger);

        logger.log("Starting batch simulation");
        logger.log(&rule());
        logger.log(&format!("Total simulations to run: {}", total));
        logger.blank();
        obs::emit_batch_started(&batch_id, &sweep_digest, total);

        self.advance(BatchState::CleaningUp);
        let artifact_path = self.config.artifact.resolve();
        let cleanup = ResultFileJanitor::cleanup(&artifact_path);
        if cleanup.removed {
            logger.log(&format!(
                "Cleaned up old results file: {}",
                artifact_path.display()
            ));
        }
        if let Some(cause) = &cleanup.warning {
            logger.log(&format!("Warning: Could not clean old results file: {}", cause));
        }
        obs::emit_cleanup(&artifact_path, &cleanup);

        let mut tally = BatchTally::new(total);
        let mut outcomes = Vec::with_capacity(total);
        let sweep = self.config.sweep.clone();
        let strategy = self.config.strategy.clone();
        let invoker = RunInvoker::new(&strategy, logger.as_ref());

        for (index, point) in sweep.indexed() {
            self.advance(BatchState::Running { index });
            let outcome = invoker.run(point, index, total).await?;
            tally.record(&outcome);
            outcomes.push(outcome);
            logger.blank();
        }

        self.advance(BatchState::Completed);
        SummaryReporter::emit(logger.as_ref(), &tally, &self.config.artifact);

        let report = BatchReport {
            batch_id,
            sweep_digest,
            cleanup,
            outcomes,
            tally,
            artifact: self.config.artifact.clone(),
            started_at,
            finished_at: Utc::now(),
        };
        obs::emit_batch_finished(&report.batch_id, &report.tally, report.duration_ms());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ResultArtifactPath;
    use crate::logger::MemoryLogger;
    use crate::strategy::InvocationStrategy;
    use crate::sweep::Sweep;

    fn config(dir: &std::path::Path, distances: &[u64], script: &str) -> BatchConfig {
        BatchConfig::new(
            Sweep::from_distances(distances, 10),
            InvocationStrategy::direct("sh").with_leading_args(vec![
                "-c".to_string(),
                script.to_string(),
                "sim".to_string(),
            ]),
            ResultArtifactPath::new(dir, "results.csv"),
        )
    }

    #[test]
    fn test_state_order() {
        assert!(BatchState::CleaningUp.rank() > BatchState::NotStarted.rank());
        assert!(BatchState::Running { index: 1 }.rank() > BatchState::CleaningUp.rank());
        assert!(BatchState::Running { index: 2 }.rank() > BatchState::Running { index: 1 }.rank());
        assert!(BatchState::Completed.rank() > BatchState::Running { index: 99 }.rank());
    }

    #[tokio::test]
    async fn test_empty_sweep_completes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let logger = Arc::new(MemoryLogger::new());
        let mut driver = BatchDriver::new(config(dir.path(), &[], "exit 0"), logger.clone());

        let report = driver.run().await.expect("batch");
        assert_eq!(driver.state(), BatchState::Completed);
        assert_eq!(report.tally, BatchTally::new(0));
        assert!(report.outcomes.is_empty());
        assert_eq!(report.exit_code(), 0);
        assert!(logger.matching("Running simulation").is_empty());
        assert_eq!(logger.matching("Total simulations to run: 0").len(), 1);
    }

    #[tokio::test]
    async fn test_run_twice_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let logger = Arc::new(MemoryLogger::new());
        let mut driver = BatchDriver::new(config(dir.path(), &[10], "exit 0"), logger);

        driver.run().await.expect("first run");
        let err = driver.run().await.unwrap_err();
        assert!(matches!(err, BatchError::AlreadyStarted { .. }));
    }

    #[tokio::test]
    async fn test_cleanup_happens_before_first_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let csv = dir.path().join("results.csv");
        std::fs::write(&csv, "stale\n").expect("write");

        // The run reports whether the stale file is still present.
        let script = format!("if [ -e '{}' ]; then exit 9; fi; exit 0", csv.display());
        let logger = Arc::new(MemoryLogger::new());
        let mut driver = BatchDriver::new(config(dir.path(), &[10], &script), logger.clone());

        let report = driver.run().await.expect("batch");
        assert!(report.cleanup.removed);
        assert_eq!(report.tally.succeeded, 1);
        assert_eq!(logger.matching("Cleaned up old results file").len(), 1);
        assert!(!csv.exists());
    }

    #[tokio::test]
    async fn test_cleanup_warning_does_not_abort() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("results.csv")).expect("mkdir");
        let logger = Arc::new(MemoryLogger::new());
        let mut driver = BatchDriver::new(config(dir.path(), &[10, 20], "exit 0"), logger.clone());

        let report = driver.run().await.expect("batch");
        assert!(report.cleanup.warning.is_some());
        assert_eq!(logger.matching("Warning: Could not clean old results file").len(), 1);
        assert_eq!(report.tally.succeeded, 2);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_sweep() {
        let dir = tempfile::tempdir().expect("tempdir");
        let logger = Arc::new(MemoryLogger::new());
        let mut driver =
            BatchDriver::new(config(dir.path(), &[10, 20, 30], "exit 1"), logger.clone());

        let report = driver.run().await.expect("batch");
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.tally.failed, 3);
        assert_eq!(report.exit_code(), 1);
        assert_eq!(logger.matching("Running simulation").len(), 3);
    }
}
