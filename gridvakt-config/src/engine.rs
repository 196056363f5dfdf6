//! Evaluator configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Parameters of the evaluation loop.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct EngineConfig {
    /// Telemetry batch channel capacity.
    #[validate(range(min = 1, max = 4096))]
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Wall-clock delay between evaluation ticks in live mode (ms).
    #[validate(range(min = 10, max = 600_000))]
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_channel_capacity() -> usize {
    64
}
fn default_tick_interval_ms() -> u64 {
    1000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        let config = EngineConfig {
            channel_capacity: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
