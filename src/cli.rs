// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `taskpipe`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskpipe",
    version,
    about = "Run fixed build pipelines, re-triggering them on file changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Pipeline to run (`build`, `watch`, or the default pipeline).
    #[arg(value_name = "PIPELINE", default_value = "default")]
    pub pipeline: String,

    /// Active environment (e.g. `development`, `production`).
    ///
    /// If omitted, the environment resolver falls back to `development`.
    /// The `build` pipeline forces `production` regardless of this flag.
    #[arg(long, value_name = "NAME")]
    pub env: Option<String>,

    /// Project root containing the `src/` source tree.
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub root: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKPIPE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print registered tasks and pipeline composition, then exit.
    #[arg(long)]
    pub list: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
