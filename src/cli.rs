// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `frontwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "frontwatch",
    version,
    about = "Incrementally run front-end build steps based on file changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Frontwatch.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Frontwatch.toml")]
    pub config: String,

    /// Run a named pipeline once and exit instead of watching.
    #[arg(long, value_name = "NAME")]
    pub pipeline: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FRONTWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print steps and pipelines, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
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
