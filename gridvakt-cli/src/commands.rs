use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use gridvakt_config::GridvaktConfig;
use gridvakt_engine::{
    load_topology_file, run_live_mode, run_replay_mode, run_simulation_mode,
};
use gridvakt_telemetry::metrics::MetricsRecorder;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run continuous evaluation over a live telemetry feed
    Run(RunArgs),
    /// Run a deterministic simulation (or replay a recorded scenario)
    Simulate(SimulateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Topology graph description (JSON)
    #[arg(short, long)]
    pub topology: PathBuf,
    /// Stop after this many ticks (runs until interrupted if omitted)
    #[arg(long)]
    pub ticks: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Topology graph description (JSON)
    #[arg(short, long)]
    pub topology: PathBuf,
    /// Optional scenario file to replay; if not provided, a seeded
    /// simulation is run.
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,
    /// Number of ticks to simulate (used when no scenario is provided)
    #[arg(long, default_value_t = 60)]
    pub ticks: usize,
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Expected final state hash; the run fails if it differs
    #[arg(long)]
    pub validate_hash: Option<String>,
}

pub async fn run(
    args: RunArgs,
    metrics: MetricsRecorder,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = GridvaktConfig::load()?;
    let topology = Arc::new(load_topology_file(&args.topology)?);
    run_live_mode(&config, topology, args.ticks, metrics).await?;
    Ok(())
}

pub async fn simulate(
    args: SimulateArgs,
    metrics: MetricsRecorder,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut config = GridvaktConfig::load()?;
    config.simulator.seed = args.seed;
    let topology = Arc::new(load_topology_file(&args.topology)?);

    match args.scenario {
        Some(path) => {
            run_replay_mode(&config, topology, path, metrics).await?;
        }
        None => {
            let hash = run_simulation_mode(
                &config,
                topology,
                args.ticks,
                args.validate_hash.as_deref(),
                metrics,
            )
            .await?;
            println!("{hash}");
        }
    }
    Ok(())
}
