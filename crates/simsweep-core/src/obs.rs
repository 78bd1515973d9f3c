//! Structured tracing events for the batch lifecycle.
//!
//! Human progress lines go through [`crate::BatchLogger`]; these events carry
//! the same milestones as key/value fields for log aggregation. Enable them
//! with `RUST_LOG=simsweep_core=info` or `--verbose`.

use crate::invoker::RunOutcome;
use crate::janitor::CleanupOutcome;
use crate::tally::BatchTally;
use std::path::Path;
use tracing::{debug, info, warn};

/// Span tagging every event of one batch with its id.
///
/// Attach with `Instrument::instrument` rather than entering it, since the
/// batch future awaits child processes.
pub fn batch_span(batch_id: &str) -> tracing::Span {
    tracing::info_span!("simsweep.batch", batch_id = %batch_id)
}

pub fn emit_batch_started(batch_id: &str, sweep_digest: &str, total: usize) {
    info!(
        event = "batch.started",
        batch_id = %batch_id,
        sweep_digest = %sweep_digest,
        total = total,
    );
}

pub fn emit_cleanup(path: &Path, outcome: &CleanupOutcome) {
    match &outcome.warning {
        Some(cause) => warn!(
            event = "batch.cleanup_failed",
            path = %path.display(),
            error = %cause,
        ),
        None => info!(
            event = "batch.cleanup",
            path = %path.display(),
            removed = outcome.removed,
        ),
    }
}

pub fn emit_run_started(index: usize, program: &str, args: &[String]) {
    debug!(
        event = "run.started",
        index = index,
        program = %program,
        args = ?args,
    );
}

pub fn emit_run_finished(outcome: &RunOutcome) {
    match &outcome.failure {
        None => info!(
            event = "run.finished",
            index = outcome.index,
            distance = outcome.point.distance,
            duration_ms = outcome.duration_ms,
            success = true,
        ),
        Some(cause) => warn!(
            event = "run.finished",
            index = outcome.index,
            distance = outcome.point.distance,
            duration_ms = outcome.duration_ms,
            success = false,
            cause = %cause,
        ),
    }
}

pub fn emit_batch_finished(batch_id: &str, tally: &BatchTally, duration_ms: u64) {
    info!(
        event = "batch.finished",
        batch_id = %batch_id,
        total = tally.total,
        succeeded = tally.succeeded,
        failed = tally.failed,
        duration_ms = duration_ms,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_span_create() {
        let span = batch_span("test-batch-id");
        let _entered = span.enter();
    }
}
