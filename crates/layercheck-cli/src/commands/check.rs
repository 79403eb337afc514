//! Check command implementation.

use std::path::PathBuf;

use layercheck_core::{check_layers, format_json, format_text, load_config};

use crate::OutputFormat;

/// Arguments for `layercheck check`.
#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Path to the layers.yaml config file
    #[arg(short, long, default_value = "layers.yaml")]
    pub config: PathBuf,

    /// Root directory of the monorepo
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Include test files in the check
    #[arg(long)]
    pub include_tests: bool,

    /// Exclude test files from the check (default)
    #[arg(long)]
    pub exclude_tests: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Runs the check and returns the process exit code:
/// 0 clean, 1 violations found, 2 config or usage error.
pub fn run(args: &CheckArgs) -> u8 {
    let root = match args.root.canonicalize() {
        Ok(root) => root,
        Err(e) => {
            eprintln!("Error: cannot resolve root {}: {e}", args.root.display());
            return 2;
        }
    };

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return 2;
        }
    };

    let include_tests = args.include_tests && !args.exclude_tests;

    tracing::info!(
        root = %root.display(),
        include_tests,
        "checking layer boundaries"
    );

    let violations = check_layers(&root, &config, include_tests);

    let rendered = match args.format {
        OutputFormat::Json => match format_json(&violations) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Error: {e}");
                return 2;
            }
        },
        OutputFormat::Text => format_text(&violations, Some(&root)),
    };
    println!("{rendered}");

    u8::from(!violations.is_empty())
}
