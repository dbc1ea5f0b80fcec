// src/logging.rs

//! Logging setup for `taskpipe`.
//!
//! The subscriber filter comes from, in order of precedence:
//! 1. the `--log-level` CLI flag (a single global level)
//! 2. the `TASKPIPE_LOG` environment variable, which accepts full
//!    `EnvFilter` directives (e.g. `taskpipe::watch=debug,info`)
//! 3. `info`
//!
//! Logs go to stderr; stdout stays free for task output such as `--list`.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

const ENV_VAR: &str = "TASKPIPE_LOG";
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(ENV_VAR).ok().as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Resolve the active filter. An unparsable `TASKPIPE_LOG` value falls
/// back to the default rather than aborting startup.
fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(directive(level));
    }

    match env_value {
        Some(directives) => EnvFilter::try_new(directives)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        None => EnvFilter::new(DEFAULT_FILTER),
    }
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
