//! simsweep - batch orchestration for external simulations
//!
//! Drives a pre-built simulation executable across a fixed parameter sweep:
//! - Removes the stale aggregate result file before the batch
//! - Runs the executable once per parameter point, strictly in order
//! - Classifies each run and keeps a success/failure tally
//! - Summarizes the batch and reports where results were written

pub mod artifact;
pub mod batch;
pub mod config;
pub mod error;
pub mod invoker;
pub mod janitor;
pub mod logger;
pub mod obs;
pub mod report;
pub mod strategy;
pub mod summary;
pub mod sweep;
pub mod tally;
pub mod telemetry;

// Re-export key types
pub use artifact::ResultArtifactPath;
pub use batch::{BatchDriver, BatchState};
pub use config::BatchConfig;
pub use error::{BatchError, BatchResult, ConfigError};
pub use invoker::{FailureCause, RunInvoker, RunOutcome, RunStatus};
pub use janitor::{CleanupOutcome, ResultFileJanitor};
pub use logger::{BatchLogger, ConsoleLogger, MemoryLogger};
pub use report::BatchReport;
pub use strategy::{InvocationStrategy, Launcher};
pub use summary::SummaryReporter;
pub use sweep::{ParameterPoint, Sweep};
pub use tally::BatchTally;
pub use telemetry::{init_tracing, level_for};
