// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::{Behaviour, BuildSystemKind, Platform, Toolset};

/// Command-line arguments for `toolstrap`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "toolstrap",
    version,
    about = "Make sure the build toolchain is installed, then generate, build or clean the solution.",
    long_about = None
)]
pub struct CliArgs {
    /// Which build system drives the solution.
    #[arg(long, value_enum, value_name = "KIND", alias = "build_system")]
    pub build_system: Option<BuildSystemKind>,

    /// Target platform (overrides `[build].platform`).
    #[arg(long, value_enum, value_name = "PLATFORM")]
    pub platform: Option<Platform>,

    /// Toolset: GNU makefiles or Visual Studio projects (overrides
    /// `[build].toolset`).
    #[arg(long, value_enum, value_name = "TOOLSET")]
    pub toolset: Option<Toolset>,

    /// What to do. Required unless `--dry-run` is given.
    #[arg(long, value_enum, value_name = "BEHAVIOUR")]
    pub behave: Option<Behaviour>,

    /// Path to the config file (TOML), `Toolstrap.toml` if omitted. A
    /// missing file means defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Solution root (overrides `[solution].root`).
    #[arg(long, value_name = "DIR")]
    pub root: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TOOLSTRAP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve config and print the dependency plan, but don't check,
    /// install or build anything.
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

/// Parse the process arguments.
///
/// Bad arguments exit with status 1; `--help` and `--version` exit 0.
pub fn parse() -> CliArgs {
    match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            // Nothing useful to do if the terminal is gone.
            let _ = err.print();
            std::process::exit(code);
        }
    }
}
