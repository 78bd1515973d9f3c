//! Running success/failure counters.

use crate::invoker::RunOutcome;
use serde::{Deserialize, Serialize};

/// Counters for one batch. `succeeded + failed` never exceeds `total`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchTally {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchTally {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            succeeded: 0,
            failed: 0,
        }
    }

    /// Count one finished run.
    pub fn record(&mut self, outcome: &RunOutcome) {
        if outcome.succeeded() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        debug_assert!(self.processed() <= self.total);
    }

    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn is_complete(&self) -> bool {
        self.processed() == self.total
    }

    /// True when nothing failed (an empty batch counts as success).
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::{FailureCause, RunStatus};
    use crate::sweep::ParameterPoint;

    fn outcome(index: usize, ok: bool) -> RunOutcome {
        RunOutcome {
            index,
            point: ParameterPoint::new(10, 10),
            status: if ok { RunStatus::Succeeded } else { RunStatus::Failed },
            exit_code: Some(if ok { 0 } else { 1 }),
            stdout: String::new(),
            stderr: String::new(),
            duration_ms: 1,
            failure: if ok {
                None
            } else {
                Some(FailureCause::NonZeroExit { code: Some(1) })
            },
        }
    }

    #[test]
    fn test_tally_counts() {
        let mut tally = BatchTally::new(3);
        tally.record(&outcome(1, true));
        tally.record(&outcome(2, false));
        assert_eq!(tally.processed(), 2);
        assert!(!tally.is_complete());
        tally.record(&outcome(3, true));

        assert_eq!(
            tally,
            BatchTally {
                total: 3,
                succeeded: 2,
                failed: 1
            }
        );
        assert!(tally.is_complete());
        assert!(!tally.all_succeeded());
    }

    #[test]
    fn test_empty_tally_is_success() {
        let tally = BatchTally::new(0);
        assert!(tally.is_complete());
        assert!(tally.all_succeeded());
    }
}
