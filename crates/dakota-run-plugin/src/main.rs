//! dakota_run_plugin - generic analysis driver
//!
//! Dakota calls this once per evaluation with the parameters file it
//! wrote and the results file it expects back:
//!
//! ```text
//! dakota_run_plugin params.in.1 results.out.1
//! ```
//!
//! The configuration record named on the `AC_1` line selects the plugin.

use anyhow::{Context, Result};
use clap::Parser;
use dakota_core::telemetry::init_tracing;
use dakota_core::VERSION;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "dakota_run_plugin")]
#[command(version = VERSION)]
#[command(about = "Run one Dakota evaluation through a model plugin", long_about = None)]
struct Cli {
    /// Parameters file written by Dakota for this evaluation
    parameters_file: PathBuf,

    /// Results file Dakota reads back
    results_file: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    dakota_plugins::run_evaluation(&cli.parameters_file, &cli.results_file).with_context(|| {
        format!(
            "Evaluation failed for {}",
            cli.parameters_file.display()
        )
    })
}
