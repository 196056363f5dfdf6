//! ## gridvakt-cli
//! **Operational interface for the cascading-risk engine**
//!
//! Live evaluation over a generated telemetry feed, deterministic
//! simulation with state-hash validation, and scenario replay.

use clap::Parser;
use gridvakt_telemetry::logging::EventLogger;
use gridvakt_telemetry::metrics::MetricsRecorder;

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    EventLogger::init();
    let metrics = MetricsRecorder::new();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(run_args) => commands::run(run_args, metrics).await,
        Commands::Simulate(sim_args) => commands::simulate(sim_args, metrics).await,
    }
}
