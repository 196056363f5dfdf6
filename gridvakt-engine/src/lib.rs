//! # Gridvakt Engine
//!
//! The evaluator: owns the topology, the reading cache, and the alert
//! lifecycle manager, and drives evaluation ticks over incoming telemetry
//! batches. Frontends (CLI, services) reuse the runtime entrypoints here.

pub mod error;
pub mod runtime;

pub use error::EngineError;
pub use runtime::{
    load_topology_file, run_live_mode, run_replay_mode, run_simulation_mode, RiskEngine,
};
