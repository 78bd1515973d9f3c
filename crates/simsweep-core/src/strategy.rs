//! How the simulation executable is reached for each run.

use crate::artifact::absolutize;
use crate::error::ConfigError;
use crate::sweep::ParameterPoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Compiled simulation binary used by default.
pub const DEFAULT_EXECUTABLE: &str = "/ns3/build/wifi-simple-batch";

/// Directory the simulation expects as its working directory.
pub const DEFAULT_WORKING_DIR: &str = "/ns3";

/// Launcher kinds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Launcher {
    /// `<program> <leading_args..> --distance=<d> --time=<t>`
    Direct {
        program: PathBuf,
        #[serde(default)]
        leading_args: Vec<String>,
    },

    /// `<program> <args..> "<target> --distance=<d> --time=<t>"`
    ///
    /// The target and its flags travel as a single argument, as wrapper
    /// scripts like `ns3 run` expect.
    Wrapper {
        program: PathBuf,
        #[serde(default)]
        args: Vec<String>,
        target: String,
    },
}

impl Launcher {
    pub fn program(&self) -> &Path {
        match self {
            Launcher::Direct { program, .. } | Launcher::Wrapper { program, .. } => program,
        }
    }
}

/// Invocation strategy chosen once per batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvocationStrategy {
    pub launcher: Launcher,

    /// Working directory for every run.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Extra environment variables for every run.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Per-run timeout in seconds (0 = wait indefinitely).
    #[serde(default)]
    pub timeout_secs: u64,
}

impl Default for InvocationStrategy {
    fn default() -> Self {
        Self::direct(DEFAULT_EXECUTABLE).in_dir(DEFAULT_WORKING_DIR)
    }
}

impl InvocationStrategy {
    /// Run a compiled binary directly.
    pub fn direct(program: impl Into<PathBuf>) -> Self {
        Self::from_launcher(Launcher::Direct {
            program: program.into(),
            leading_args: Vec::new(),
        })
    }

    /// Run through a wrapper command such as `./ns3 run <target>`.
    pub fn wrapper(program: impl Into<PathBuf>, args: Vec<String>, target: impl Into<String>) -> Self {
        Self::from_launcher(Launcher::Wrapper {
            program: program.into(),
            args,
            target: target.into(),
        })
    }

    fn from_launcher(launcher: Launcher) -> Self {
        Self {
            launcher,
            working_dir: None,
            env: BTreeMap::new(),
            timeout_secs: 0,
        }
    }

    /// Arguments placed before the parameter flags of a direct launcher.
    /// Ignored for wrappers.
    pub fn with_leading_args(mut self, args: Vec<String>) -> Self {
        if let Launcher::Direct { leading_args, .. } = &mut self.launcher {
            *leading_args = args;
        }
        self
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Program to spawn.
    ///
    /// A relative path with a directory part (`./ns3`, `build/sim`) is taken
    /// relative to the working directory when one is set and made absolute.
    /// Bare names are left for `PATH` lookup.
    pub fn resolved_program(&self) -> PathBuf {
        let program = self.launcher.program();
        match &self.working_dir {
            Some(dir) if program.is_relative() && has_dir_component(program) => {
                absolutize(&dir.join(program))
            }
            _ => program.to_path_buf(),
        }
    }

    /// Arguments passed to the program for `point`.
    pub fn args_for(&self, point: &ParameterPoint) -> Vec<String> {
        match &self.launcher {
            Launcher::Direct { leading_args, .. } => {
                let mut args = leading_args.clone();
                args.extend(point.args());
                args
            }
            Launcher::Wrapper { args, target, .. } => {
                let mut out = args.clone();
                let mut line = vec![target.clone()];
                line.extend(point.args());
                out.push(line.join(" "));
                out
            }
        }
    }

    /// Full command line (program first), for logging.
    pub fn command_line(&self, point: &ParameterPoint) -> Vec<String> {
        let mut cmd = vec![self.resolved_program().to_string_lossy().into_owned()];
        cmd.extend(self.args_for(point));
        cmd
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.launcher.program().as_os_str().is_empty() {
            return Err(ConfigError::Invalid("executable path is empty".to_string()));
        }
        if let Launcher::Wrapper { target, .. } = &self.launcher {
            if target.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "wrapper launcher requires a target".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn has_dir_component(path: &Path) -> bool {
    path.components().count() > 1
        || matches!(path.components().next(), Some(Component::CurDir | Component::ParentDir))
}
