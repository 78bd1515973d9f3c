//! Error types for batch orchestration.
//!
//! Display strings name only the failing operation. Underlying causes are
//! exposed through `source()`, so an `anyhow` `{:#}` chain prints each once.

use std::path::PathBuf;

/// Errors raised while loading or validating a [`crate::BatchConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that abort a batch.
///
/// Expected per-run failures (missing executable, non-zero exit, timeout) are
/// not errors; they are recorded as [`crate::RunOutcome`] values instead.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("batch already started (state: {state})")]
    AlreadyStarted { state: String },

    #[error("run {index} could not be invoked ({program})")]
    Invocation {
        index: usize,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write batch report to {path}")]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize batch report")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid batch configuration")]
    Config(#[from] ConfigError),
}

/// Result type for batch operations.
pub type BatchResult<T> = std::result::Result<T, BatchError>;
