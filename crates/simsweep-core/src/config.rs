//! Batch configuration: the sweep, how to invoke the executable, and where
//! its results land.

use crate::artifact::ResultArtifactPath;
use crate::error::ConfigError;
use crate::strategy::InvocationStrategy;
use crate::sweep::Sweep;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything a [`crate::BatchDriver`] needs. Fields missing from a config
/// file fall back to the baseline batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchConfig {
    #[serde(default = "Sweep::baseline")]
    pub sweep: Sweep,

    #[serde(default)]
    pub strategy: InvocationStrategy,

    #[serde(default)]
    pub artifact: ResultArtifactPath,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            sweep: Sweep::baseline(),
            strategy: InvocationStrategy::default(),
            artifact: ResultArtifactPath::default(),
        }
    }
}

impl BatchConfig {
    pub fn new(sweep: Sweep, strategy: InvocationStrategy, artifact: ResultArtifactPath) -> Self {
        Self {
            sweep,
            strategy,
            artifact,
        }
    }

    /// Load a JSON config file and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strategy.validate()?;
        if self.artifact.file_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "result file name is empty".to_string(),
            ));
        }
        Ok(())
    }
}
