//! layercheck CLI.
//!
//! Usage:
//! ```bash
//! layercheck check --config layers.yaml --root .
//! ```
//!
//! Exit codes: 0 when no violations were found, 1 when at least one was,
//! 2 for usage or configuration errors.

use clap::{CommandFactory, Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

/// Import-boundary linter for layered Python monorepos.
#[derive(Parser)]
#[command(name = "layercheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check for layer-boundary violations
    Check(commands::check::CheckArgs),
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let code = match cli.command {
        Some(Commands::Check(args)) => commands::check::run(&args),
        None => {
            let _ = Cli::command().print_help();
            2
        }
    };

    ExitCode::from(code)
}
