//! Tracing setup for the `simsweep` binary.
//!
//! Stdout belongs to the batch log: the `[HH:MM:SS]` progress lines and the
//! summary that operators read and wrapper scripts grep for
//! "Batch simulation completed!" or the `Failed:` count. Tracing events are
//! a second channel for diagnosing the orchestrator itself, so they always
//! go to stderr and can be redirected or parsed as JSON without disturbing
//! the batch log.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose events pass the default filter.
const SIMSWEEP_TARGETS: [&str; 2] = ["simsweep_core", "simsweep"];

/// Default tracing level: run-level warnings only, or everything down to
/// state transitions and spawned command lines with `--verbose`.
pub fn level_for(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Filter directives used when `RUST_LOG` is not set. Dependencies stay at
/// `warn` so tokio internals do not flood a verbose batch.
pub fn default_directives(level: Level) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(
        SIMSWEEP_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, level.as_str().to_lowercase())),
    );
    directives.join(",")
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` overrides [`default_directives`]. Only the first call in a
/// process takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .ok();
    }
}
