//! Command implementations for the AQF CLI.
//!
//! Each analysis subcommand reads a CSV dataset, runs the pipeline and
//! writes the JSON body an HTTP endpoint would return, either to stdout
//! or to `--output`. Failures are written as the structured error body
//! and also returned, so the process exits non-zero.

use clap::{Args, Subcommand};
use std::path::PathBuf;

pub mod analyze;
pub mod columns;

/// Flags shared by the analysis subcommands.
#[derive(Args, Debug, Clone)]
pub struct AnalysisArgs {
    /// CSV dataset with a date column and a PM2.5/AQI column
    #[arg(short, long)]
    pub dataset: PathBuf,

    /// Write the JSON body here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON file with analysis settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Upper bound on model fitting, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Number of days to forecast
    #[arg(long)]
    pub horizon: Option<usize>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Full analysis: 30-day forecast, model evaluation and all report sections
    Analyze {
        #[command(flatten)]
        args: AnalysisArgs,

        /// Reference photo for the smog overlay
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Quick analysis: 7-day forecast and the core sections only
    Quick {
        #[command(flatten)]
        args: AnalysisArgs,
    },

    /// Show how the dataset's headers map onto date and pollutant fields
    Columns {
        /// CSV dataset to inspect
        #[arg(short, long)]
        dataset: PathBuf,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Analyze { args, image } => analyze::run_full(&args, image.as_deref()).await,
        Command::Quick { args } => analyze::run_quick(&args).await,
        Command::Columns { dataset } => columns::run_columns(&dataset),
    }
}
