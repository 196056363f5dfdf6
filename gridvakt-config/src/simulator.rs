//! Deterministic telemetry generator configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Parameters for the seeded telemetry generator.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct SimulatorConfig {
    /// Seed for the generator's RNG and virtual clock.
    #[serde(default)]
    pub seed: u64,

    /// Virtual time between generated batches (ms).
    #[validate(range(min = 10, max = 60_000))]
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Maximum per-tick random-walk step for temperature and load.
    #[validate(range(min = 0.1, max = 50.0))]
    #[serde(default = "default_volatility")]
    pub volatility: f64,

    /// Per-tick fuel drain for generator nodes.
    #[validate(range(min = 0.0, max = 20.0))]
    #[serde(default = "default_fuel_drain")]
    pub fuel_drain: f64,
}

fn default_tick_ms() -> u64 {
    1000
}
fn default_volatility() -> f64 {
    6.0
}
fn default_fuel_drain() -> f64 {
    1.5
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            tick_ms: default_tick_ms(),
            volatility: default_volatility(),
            fuel_drain: default_fuel_drain(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_simulator_config_is_valid() {
        SimulatorConfig::default()
            .validate()
            .expect("defaults must validate");
    }

    #[test]
    fn absurd_volatility_is_rejected() {
        let config = SimulatorConfig {
            volatility: 500.0,
            ..SimulatorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
