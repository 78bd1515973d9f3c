//! Single-run process invocation and outcome classification.

use crate::error::{BatchError, BatchResult};
use crate::logger::BatchLogger;
use crate::obs;
use crate::strategy::InvocationStrategy;
use crate::sweep::ParameterPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Whether a run succeeded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Succeeded,
    Failed,
}

/// Why a run failed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum FailureCause {
    /// The program could not be found at spawn time.
    ExecutableNotFound { program: String },

    /// The process exited non-zero. `code` is `None` when killed by a signal.
    NonZeroExit { code: Option<i32> },

    /// The configured working directory does not exist.
    WorkingDirMissing { dir: PathBuf },

    /// The process outlived the configured timeout and was killed.
    TimedOut { after_secs: u64 },
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::ExecutableNotFound { program } => {
                write!(f, "executable not found: {}", program)
            }
            FailureCause::NonZeroExit { code: Some(code) } => {
                write!(f, "non-zero exit (code {})", code)
            }
            FailureCause::NonZeroExit { code: None } => {
                write!(f, "non-zero exit (terminated by signal)")
            }
            FailureCause::WorkingDirMissing { dir } => {
                write!(f, "working directory not found: {}", dir.display())
            }
            FailureCause::TimedOut { after_secs } => {
                write!(f, "timed out after {} seconds", after_secs)
            }
        }
    }
}

/// Result of one invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunOutcome {
    /// 1-based position in the sweep.
    pub index: usize,

    pub point: ParameterPoint,

    pub status: RunStatus,

    /// Exit code, when the process ran to completion.
    pub exit_code: Option<i32>,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Wall time in milliseconds.
    pub duration_ms: u64,

    /// Set only for failed runs.
    pub failure: Option<FailureCause>,
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == RunStatus::Succeeded
    }

    /// Captured stdout and stderr joined, for failed runs.
    pub fn diagnostics(&self) -> String {
        let mut text = String::new();
        if !self.stdout.trim().is_empty() {
            text.push_str(self.stdout.trim_end());
        }
        if !self.stderr.trim().is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(self.stderr.trim_end());
        }
        text
    }

    fn failed(
        index: usize,
        point: &ParameterPoint,
        cause: FailureCause,
        duration_ms: u64,
    ) -> Self {
        Self {
            index,
            point: *point,
            status: RunStatus::Failed,
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            duration_ms,
            failure: Some(cause),
        }
    }
}

/// Runs the simulation once per parameter point.
pub struct RunInvoker<'a> {
    strategy: &'a InvocationStrategy,
    logger: &'a dyn BatchLogger,
}

impl<'a> RunInvoker<'a> {
    pub fn new(strategy: &'a InvocationStrategy, logger: &'a dyn BatchLogger) -> Self {
        Self { strategy, logger }
    }

    /// Invoke the executable for `point` and wait for it to finish.
    ///
    /// Missing executables, non-zero exits, a missing working directory and
    /// timeouts become failed outcomes. Any other I/O failure is returned as
    /// [`BatchError::Invocation`].
    pub async fn run(
        &self,
        point: &ParameterPoint,
        index: usize,
        total: usize,
    ) -> BatchResult<RunOutcome> {
        self.logger
            .log(&format!("Running simulation {}/{} - {}", index, total, point));

        let outcome = self.execute(point, index).await?;
        self.log_outcome(&outcome);
        obs::emit_run_finished(&outcome);
        Ok(outcome)
    }

    async fn execute(&self, point: &ParameterPoint, index: usize) -> BatchResult<RunOutcome> {
        let start = Instant::now();
        let program = self.strategy.resolved_program();
        let program_name = program.to_string_lossy().into_owned();

        if let Some(dir) = &self.strategy.working_dir {
            if !dir.is_dir() {
                return Ok(RunOutcome::failed(
                    index,
                    point,
                    FailureCause::WorkingDirMissing { dir: dir.clone() },
                    0,
                ));
            }
        }

        let args = self.strategy.args_for(point);
        obs::emit_run_started(index, &program_name, &args);

        let mut command = Command::new(&program);
        command
            .args(&args)
            .envs(&self.strategy.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.strategy.working_dir {
            command.current_dir(dir);
        }

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(RunOutcome::failed(
                    index,
                    point,
                    FailureCause::ExecutableNotFound {
                        program: program_name,
                    },
                    elapsed_ms(start),
                ));
            }
            Err(source) => {
                return Err(BatchError::Invocation {
                    index,
                    program: program_name,
                    source,
                })
            }
        };

        let waited = if self.strategy.timeout_secs > 0 {
            match tokio::time::timeout(
                Duration::from_secs(self.strategy.timeout_secs),
                child.wait_with_output(),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => {
                    // Dropping the pending future drops the child, which kills it.
                    return Ok(RunOutcome::failed(
                        index,
                        point,
                        FailureCause::TimedOut {
                            after_secs: self.strategy.timeout_secs,
                        },
                        elapsed_ms(start),
                    ));
                }
            }
        } else {
            child.wait_with_output().await
        };

        let output = waited.map_err(|source| BatchError::Invocation {
            index,
            program: program_name,
            source,
        })?;

        let exit_code = output.status.code();
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let (status, failure) = if output.status.success() {
            (RunStatus::Succeeded, None)
        } else {
            (
                RunStatus::Failed,
                Some(FailureCause::NonZeroExit { code: exit_code }),
            )
        };

        Ok(RunOutcome {
            index,
            point: *point,
            status,
            exit_code,
            stdout,
            stderr,
            duration_ms: elapsed_ms(start),
            failure,
        })
    }

    fn log_outcome(&self, outcome: &RunOutcome) {
        match &outcome.failure {
            None => self.logger.log("  ✓ Completed successfully"),
            Some(cause @ FailureCause::NonZeroExit { .. }) => {
                self.logger.log(&format!("  ✗ Failed: {}", cause));
                self.logger
                    .log(&format!("  Stdout: {}", outcome.stdout.trim_end()));
                self.logger
                    .log(&format!("  Stderr: {}", outcome.stderr.trim_end()));
            }
            Some(cause) => self.logger.log(&format!("  ✗ Failed: {}", cause)),
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
