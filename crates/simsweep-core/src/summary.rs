//! End-of-batch summary lines.

use crate::artifact::ResultArtifactPath;
use crate::logger::BatchLogger;
use crate::tally::BatchTally;

/// Horizontal rule framing the banner and the summary.
pub fn rule() -> String {
    "=".repeat(50)
}

/// Prints the final tally and where the results ended up.
pub struct SummaryReporter;

impl SummaryReporter {
    pub fn emit(logger: &dyn BatchLogger, tally: &BatchTally, artifact: &ResultArtifactPath) {
        logger.log(&rule());
        logger.log("Batch simulation completed!");
        logger.log(&format!("  Successful: {}/{}", tally.succeeded, tally.total));
        logger.log(&format!("  Failed: {}/{}", tally.failed, tally.total));
        logger.log(&format!(
            "Results saved to: {}",
            artifact.resolve().display()
        ));
        if let Some(host) = artifact.host_location() {
            logger.log(&format!(
                "Results can be found on host in: {}",
                host.display()
            ));
        }
        logger.log(&rule());
    }
}
