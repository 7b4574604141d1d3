//! AQF CLI - forecast air quality from a CSV of daily readings.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "aqf-cli",
    version,
    about = "Air quality forecasting and AQI classification toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: aqf_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    aqf_cmd::run(cli.command).await
}
