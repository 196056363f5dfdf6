use thiserror::Error;
use tokio::task::JoinError;

use gridvakt_config::ConfigError;
use gridvakt_core::topology::TopologyError;
use gridvakt_simulator::scenario::ScenarioError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Topology file is not valid JSON: {0}")]
    TopologyFormat(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    #[error("Task error: {0}")]
    Join(#[from] JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("State hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
}
