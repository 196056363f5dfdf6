//! Threshold-based anomaly classification.
//!
//! A pure function from a reading to an optional severity. Directionality
//! is per metric: temperature and load fail high, fuel fails low. Absence
//! of a reading is nominal, never failing.

use serde::{Deserialize, Serialize};

use gridvakt_core::readings::{MetricKind, Reading, ReadingSnapshot};
use gridvakt_core::topology::{NodeId, Topology};

/// Alert severity, ordered so `Critical > Warning`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        })
    }
}

/// One metric's warning/critical bounds. For inverted metrics (fuel) a
/// value below the bound trips the tier.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Band {
    pub warning: f64,
    pub critical: f64,
    pub inverted: bool,
}

impl Band {
    fn classify(&self, value: f64) -> Option<Severity> {
        let trips = |bound: f64| {
            if self.inverted {
                value < bound
            } else {
                value > bound
            }
        };
        if trips(self.critical) {
            Some(Severity::Critical)
        } else if trips(self.warning) {
            Some(Severity::Warning)
        } else {
            None
        }
    }
}

/// Per-metric threshold table. The default is the reference deployment:
///
/// | metric      | WARNING | CRITICAL |
/// |-------------|---------|----------|
/// | temperature | > 75    | > 90     |
/// | load        | > 75    | > 90     |
/// | fuel        | < 40    | < 20     |
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ThresholdTable {
    pub temperature: Band,
    pub load: Band,
    pub fuel: Band,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            temperature: Band {
                warning: 75.0,
                critical: 90.0,
                inverted: false,
            },
            load: Band {
                warning: 75.0,
                critical: 90.0,
                inverted: false,
            },
            fuel: Band {
                warning: 40.0,
                critical: 20.0,
                inverted: true,
            },
        }
    }
}

impl ThresholdTable {
    fn band(&self, metric: MetricKind) -> &Band {
        match metric {
            MetricKind::Temperature => &self.temperature,
            MetricKind::Load => &self.load,
            MetricKind::Fuel => &self.fuel,
        }
    }

    /// Classifies one reading. `None` means nominal.
    pub fn classify(&self, reading: &Reading) -> Option<Severity> {
        self.band(reading.metric).classify(reading.value)
    }
}

/// Applies the table to every node's current readings and returns the
/// failing set in topology order. A node failing on several metrics gets
/// its maximum severity.
pub fn classify_snapshot(
    topology: &Topology,
    snapshot: &ReadingSnapshot,
    table: &ThresholdTable,
) -> Vec<(NodeId, Severity)> {
    let mut failing = Vec::new();
    for node in topology.all_nodes() {
        let severity = snapshot
            .current_for(&node.id)
            .filter_map(|reading| table.classify(reading))
            .max();
        if let Some(severity) = severity {
            failing.push((node.id.clone(), severity));
        }
    }
    failing
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reading(metric: MetricKind, value: f64) -> Reading {
        Reading {
            node_id: "n".into(),
            metric,
            value,
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn temperature_tiers() {
        let table = ThresholdTable::default();
        assert_eq!(table.classify(&reading(MetricKind::Temperature, 70.0)), None);
        assert_eq!(
            table.classify(&reading(MetricKind::Temperature, 80.0)),
            Some(Severity::Warning)
        );
        assert_eq!(
            table.classify(&reading(MetricKind::Temperature, 95.0)),
            Some(Severity::Critical)
        );
    }

    #[test]
    fn boundary_values_are_nominal() {
        let table = ThresholdTable::default();
        assert_eq!(table.classify(&reading(MetricKind::Load, 75.0)), None);
        assert_eq!(
            table.classify(&reading(MetricKind::Load, 90.0)),
            Some(Severity::Warning)
        );
        assert_eq!(table.classify(&reading(MetricKind::Fuel, 40.0)), None);
    }

    #[test]
    fn fuel_direction_is_inverted() {
        let table = ThresholdTable::default();
        assert_eq!(
            table.classify(&reading(MetricKind::Fuel, 15.0)),
            Some(Severity::Critical)
        );
        assert_eq!(
            table.classify(&reading(MetricKind::Fuel, 30.0)),
            Some(Severity::Warning)
        );
        assert_eq!(table.classify(&reading(MetricKind::Fuel, 95.0)), None);
        // The same value read as load is nominal.
        assert_eq!(table.classify(&reading(MetricKind::Load, 15.0)), None);
    }

    #[test]
    fn severity_orders_critical_above_warning() {
        assert!(Severity::Critical > Severity::Warning);
    }
}
