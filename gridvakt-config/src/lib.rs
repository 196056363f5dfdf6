//! # Gridvakt Configuration System
//!
//! Hierarchical configuration for the cascading-risk engine.
//!
//! ## Features
//! - **Unified Configuration**: Single source of truth across all components
//! - **Validation**: Runtime validation of critical parameters
//! - **Environment Awareness**: File and environment overrides layered over
//!   built-in defaults

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

mod engine;
mod error;
mod monitor;
mod simulator;
mod validation;

pub use engine::EngineConfig;
pub use error::ConfigError;
pub use monitor::{MonitorConfig, ThresholdBandConfig, ThresholdsConfig};
pub use simulator::SimulatorConfig;

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct GridvaktConfig {
    /// Evaluator parameters (channel capacity, tick cadence).
    #[validate(nested)]
    pub engine: EngineConfig,

    /// Anomaly thresholds and alert lifecycle parameters.
    #[validate(nested)]
    pub monitor: MonitorConfig,

    /// Deterministic telemetry generator parameters.
    #[validate(nested)]
    pub simulator: SimulatorConfig,
}

impl GridvaktConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/gridvakt.yaml` - base settings. If missing, defaults are used.
    /// 3. `GRIDVAKT_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Self::default()))
                .merge(Yaml::file("config/gridvakt.yaml"))
                .merge(Env::prefixed("GRIDVAKT_").split("__")),
        )
    }

    /// Load from an explicit YAML file path, with env overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Self::from_figment(
            Figment::from(Serialized::defaults(Self::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed("GRIDVAKT_").split("__")),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}
