//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod extract;
mod inspect;
mod scores;
mod sources;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};
use crate::extract::Strategy;

#[derive(Parser)]
#[command(name = "sheetscore")]
#[command(about = "Extract a student's aggregate score from gradebook exports")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true, env = "SHEETSCORE_CONFIG")]
    config: Option<PathBuf>,

    /// Resolve relative paths from current working directory instead of config file location
    #[arg(long, global = true)]
    cwd: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a person's score in every configured source
    Scores {
        /// Surname (or other identifying text) to look up
        #[arg(short, long)]
        surname: Option<String>,
        /// Only query these sources (can be repeated)
        #[arg(short = 'S', long = "source")]
        sources: Vec<String>,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },

    /// List configured sources
    Sources,

    /// Show the detected layout of one source
    Inspect {
        /// Source name
        source: String,
        /// Also show how this person's row is scored
        #[arg(short, long)]
        surname: Option<String>,
    },

    /// Extract a score from a CSV file without any configuration
    Extract {
        /// CSV export to read
        file: PathBuf,
        /// Surname (or other identifying text) to look up
        #[arg(short, long)]
        surname: String,
        /// take_last, prefer_total or sum_until_total
        #[arg(long, default_value = "sum_until_total")]
        strategy: Strategy,
        /// Print the full extraction result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Parse arguments, load configuration and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        use_cwd: cli.cwd,
    };
    let (settings, _config) = load_settings_with_options(options)
        .await
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Scores {
            surname,
            sources,
            json,
        } => scores::cmd_scores(&settings, surname, &sources, json).await,
        Commands::Sources => sources::cmd_sources(&settings).await,
        Commands::Inspect { source, surname } => {
            inspect::cmd_inspect(&settings, &source, surname.as_deref()).await
        }
        Commands::Extract {
            file,
            surname,
            strategy,
            json,
        } => extract::cmd_extract(&settings, &file, &surname, strategy, json).await,
    }
}
