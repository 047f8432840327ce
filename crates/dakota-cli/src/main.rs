//! Dakotathon - Dakota experiment CLI
//!
//! The `dakotathon` command works from a YAML configuration record.
//!
//! ## Commands
//!
//! - `setup`: Write the configuration record and Dakota input file
//! - `input`: Print or write the Dakota input file
//! - `run`: Set up and run Dakota in the run directory
//! - `info`: Report where Dakota is installed

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dakota_core::telemetry::init_tracing;
use dakota_core::{library_path_env, which_dakota, Dakota, VERSION};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "dakotathon")]
#[command(author = "CSDMS")]
#[command(version = VERSION)]
#[command(about = "Configure and run Dakota experiments", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines (and JSON output for `info`)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the configuration record and Dakota input file
    Setup {
        /// Configuration record (YAML)
        #[arg(short, long, default_value = "dakota.yaml")]
        config: PathBuf,
    },

    /// Render the Dakota input file
    Input {
        /// Configuration record (YAML)
        #[arg(short, long, default_value = "dakota.yaml")]
        config: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run Dakota on the experiment
    Run {
        /// Configuration record (YAML)
        #[arg(short, long, default_value = "dakota.yaml")]
        config: PathBuf,

        /// Use the files already in the run directory
        #[arg(long)]
        no_setup: bool,
    },

    /// Show Dakota installation details
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    match cli.command {
        Commands::Setup { config } => cmd_setup(&config),
        Commands::Input { config, output } => cmd_input(&config, output.as_deref()),
        Commands::Run { config, no_setup } => cmd_run(&config, no_setup).await,
        Commands::Info => cmd_info(cli.json),
    }
}

fn load(config: &Path) -> Result<Dakota> {
    Dakota::from_config_file(config)
        .with_context(|| format!("Failed to load configuration from {}", config.display()))
}

fn cmd_setup(config: &Path) -> Result<()> {
    let mut dakota = load(config)?;
    dakota.setup().context("Failed to write experiment files")?;

    println!("Configuration: {}", dakota.configuration_file().display());
    println!("Input file:    {}", dakota.input_file_path().display());
    Ok(())
}

fn cmd_input(config: &Path, output: Option<&Path>) -> Result<()> {
    let dakota = load(config)?;
    let text = dakota.experiment.render();

    match output {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote input file");
        }
        None => print!("{text}"),
    }
    Ok(())
}

async fn cmd_run(config: &Path, no_setup: bool) -> Result<()> {
    let mut dakota = load(config)?;
    if !no_setup {
        dakota.setup().context("Failed to write experiment files")?;
    }

    let output = dakota.run().await.context("Dakota run failed")?;

    println!(
        "Dakota finished in {} ms: {}",
        output.duration_ms,
        dakota.output_file_path().display()
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct ToolkitInfo {
    version: &'static str,
    installed: bool,
    program: Option<PathBuf>,
    library_path: Option<String>,
}

fn toolkit_info() -> ToolkitInfo {
    let program = which_dakota();
    ToolkitInfo {
        version: VERSION,
        installed: program.is_some(),
        program,
        library_path: library_path_env().map(|p| p.to_string_lossy().into_owned()),
    }
}

fn cmd_info(json: bool) -> Result<()> {
    let info = toolkit_info();

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("dakotathon {}", info.version);
    match &info.program {
        Some(path) => println!("Dakota:       {}", path.display()),
        None => println!("Dakota:       not found"),
    }
    if let Some(library_path) = &info.library_path {
        println!("Library path: {library_path}");
    }
    Ok(())
}
