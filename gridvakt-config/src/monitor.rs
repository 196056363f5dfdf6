//! Monitoring and alerting configuration.
//!
//! Anomaly thresholds per metric and the alert lifecycle grace period.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use gridvakt_detection::thresholds::{Band, ThresholdTable};

use crate::validation;

/// Monitoring configuration parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct MonitorConfig {
    /// Anomaly detection thresholds.
    #[validate(nested)]
    pub thresholds: ThresholdsConfig,

    /// How long a WARNING alert survives without renewal (ms).
    #[validate(range(min = 100, max = 3_600_000))]
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,
}

fn default_grace_period_ms() -> u64 {
    8000
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdsConfig::default(),
            grace_period_ms: default_grace_period_ms(),
        }
    }
}

/// One metric's warning/critical bounds.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, Copy)]
#[validate(schema(function = validation::validate_band_ordering))]
pub struct ThresholdBandConfig {
    pub warning: f64,
    pub critical: f64,
    /// Low values trip an inverted metric.
    #[serde(default)]
    pub inverted: bool,
}

/// Per-metric anomaly thresholds. Defaults match the reference deployment.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ThresholdsConfig {
    #[validate(nested)]
    #[serde(default = "default_temperature")]
    pub temperature: ThresholdBandConfig,

    #[validate(nested)]
    #[serde(default = "default_load")]
    pub load: ThresholdBandConfig,

    #[validate(nested)]
    #[serde(default = "default_fuel")]
    pub fuel: ThresholdBandConfig,
}

fn default_temperature() -> ThresholdBandConfig {
    ThresholdBandConfig {
        warning: 75.0,
        critical: 90.0,
        inverted: false,
    }
}
fn default_load() -> ThresholdBandConfig {
    ThresholdBandConfig {
        warning: 75.0,
        critical: 90.0,
        inverted: false,
    }
}
fn default_fuel() -> ThresholdBandConfig {
    ThresholdBandConfig {
        warning: 40.0,
        critical: 20.0,
        inverted: true,
    }
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            load: default_load(),
            fuel: default_fuel(),
        }
    }
}

impl ThresholdsConfig {
    /// Builds the detector's threshold table.
    pub fn to_table(&self) -> ThresholdTable {
        let band = |config: &ThresholdBandConfig| Band {
            warning: config.warning,
            critical: config.critical,
            inverted: config.inverted,
        };
        ThresholdTable {
            temperature: band(&self.temperature),
            load: band(&self.load),
            fuel: band(&self.fuel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridvakt_detection::Severity;

    #[test]
    fn default_monitor_config_is_valid() {
        MonitorConfig::default()
            .validate()
            .expect("default config should be valid");
    }

    #[test]
    fn inverted_band_with_high_critical_is_rejected() {
        let mut config = MonitorConfig::default();
        config.thresholds.fuel.critical = 60.0; // above the warning bound
        assert!(config.validate().is_err());
    }

    #[test]
    fn regular_band_with_low_critical_is_rejected() {
        let mut config = MonitorConfig::default();
        config.thresholds.load.critical = 50.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn table_conversion_keeps_directions() {
        use gridvakt_core::readings::{MetricKind, Reading};

        let table = ThresholdsConfig::default().to_table();
        let reading = Reading {
            node_id: "n".into(),
            metric: MetricKind::Fuel,
            value: 10.0,
            observed_at: chrono::DateTime::UNIX_EPOCH,
        };
        assert_eq!(table.classify(&reading), Some(Severity::Critical));
    }
}
