//! simsweep - run a simulation executable across a parameter sweep
//!
//! With no flags, runs the baseline sweep (distances 10..200 m, 10 s each)
//! against `/ns3/build/wifi-simple-batch` from `/ns3`.
//!
//! ## Exit codes
//!
//! - `0`: every run succeeded (including an empty sweep)
//! - `1`: one or more runs failed
//! - `2`: the batch could not start or aborted on an unexpected error

use anyhow::{Context, Result};
use clap::Parser;
use simsweep_core::{
    init_tracing, level_for, BatchConfig, BatchDriver, BatchReport, ConsoleLogger,
    InvocationStrategy, Sweep,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

/// Exit code for a batch that never finished.
const EXIT_ABORTED: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "simsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run a simulation executable across a parameter sweep", long_about = None)]
struct Cli {
    /// Enable verbose tracing on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted tracing lines
    #[arg(long, global = true)]
    json: bool,

    /// JSON batch configuration (flags below override its fields)
    #[arg(short, long, env = "SIMSWEEP_CONFIG")]
    config: Option<PathBuf>,

    /// Distances to sweep, in order (comma-separated)
    #[arg(long, value_delimiter = ',')]
    distances: Option<Vec<u64>>,

    /// Duration passed to every run of --distances [default: 10]
    #[arg(long, requires = "distances")]
    time: Option<u64>,

    /// Simulation binary to run directly
    #[arg(long, conflicts_with = "wrapper")]
    executable: Option<PathBuf>,

    /// Argument placed before the parameter flags (repeatable)
    #[arg(long = "exec-arg", requires = "executable", allow_hyphen_values = true)]
    exec_args: Vec<String>,

    /// Wrapper command to run through, e.g. `./ns3`
    #[arg(long, requires = "target")]
    wrapper: Option<PathBuf>,

    /// Argument passed to the wrapper before the target (repeatable)
    #[arg(long = "wrapper-arg", requires = "wrapper", allow_hyphen_values = true)]
    wrapper_args: Vec<String>,

    /// Simulation target handed to the wrapper, e.g. `wifi-simple`
    #[arg(long, requires = "wrapper")]
    target: Option<String>,

    /// Working directory for every run
    #[arg(long)]
    workdir: Option<PathBuf>,

    /// Per-run timeout in seconds (0 waits indefinitely)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Directory the simulation writes results into
    #[arg(long)]
    results_dir: Option<PathBuf>,

    /// Aggregate result file name
    #[arg(long)]
    results_file: Option<String>,

    /// Results directory as seen from the host
    #[arg(long, env = "SIMSWEEP_HOST_RESULTS_DIR")]
    host_results_dir: Option<PathBuf>,

    /// Write a JSON batch report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Cli {
    /// Start from the config file (or the baseline) and apply flag overrides.
    fn batch_config(&self) -> Result<BatchConfig> {
        let mut config = match &self.config {
            Some(path) => BatchConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => BatchConfig::default(),
        };

        if let Some(distances) = &self.distances {
            let time = self.time.unwrap_or(simsweep_core::sweep::BASELINE_TIME);
            config.sweep = Sweep::from_distances(distances, time);
        }

        if let Some(executable) = &self.executable {
            config.strategy = rebase(
                InvocationStrategy::direct(executable).with_leading_args(self.exec_args.clone()),
                &config.strategy,
            );
        } else if let (Some(wrapper), Some(target)) = (&self.wrapper, &self.target) {
            config.strategy = rebase(
                InvocationStrategy::wrapper(wrapper, self.wrapper_args.clone(), target.as_str()),
                &config.strategy,
            );
        }

        if let Some(dir) = &self.workdir {
            config.strategy.working_dir = Some(dir.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config.strategy.timeout_secs = secs;
        }

        if let Some(dir) = &self.results_dir {
            config.artifact.results_dir = dir.clone();
        }
        if let Some(file) = &self.results_file {
            config.artifact.file_name = file.clone();
        }
        if let Some(host) = &self.host_results_dir {
            config.artifact.host_dir = Some(host.clone());
        }

        config.validate().context("Invalid batch configuration")?;
        Ok(config)
    }
}

/// Keep environment and timeout from the previous strategy. A launcher given
/// on the command line starts without the default container working dir.
fn rebase(mut launcher: InvocationStrategy, previous: &InvocationStrategy) -> InvocationStrategy {
    launcher.env = previous.env.clone();
    launcher.timeout_secs = previous.timeout_secs;
    launcher
}

async fn run(cli: &Cli) -> Result<BatchReport> {
    let config = cli.batch_config()?;
    info!(
        runs = config.sweep.len(),
        program = %config.strategy.resolved_program().display(),
        "batch configured"
    );

    let mut driver = BatchDriver::new(config, Arc::new(ConsoleLogger));
    let report = driver.run().await.context("Batch aborted")?;

    if let Some(path) = &cli.report {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        info!(path = %path.display(), "batch report written");
    }

    Ok(report)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.json, level_for(cli.verbose));

    match run(&cli).await {
        Ok(report) => ExitCode::from(report.exit_code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ABORTED)
        }
    }
}
