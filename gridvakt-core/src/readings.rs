//! Latest-reading cache.
//!
//! Holds at most one current reading per (node, metric) key; a new reading
//! overwrites the previous one. The cache keeps no history. Evaluation runs
//! against a [`ReadingSnapshot`] so one tick never observes a half-applied
//! batch.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::topology::NodeId;

/// Telemetry metric kinds. Unknown wire names are unrepresentable; they are
/// dropped during decoding (see [`crate::events`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    #[serde(rename = "temp")]
    Temperature,
    Load,
    Fuel,
}

impl MetricKind {
    pub fn from_wire(kind: &str) -> Option<Self> {
        match kind {
            "temp" => Some(Self::Temperature),
            "load" => Some(Self::Load),
            "fuel" => Some(Self::Fuel),
            _ => None,
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Temperature => "temp",
            Self::Load => "load",
            Self::Fuel => "fuel",
        }
    }
}

/// One decoded telemetry reading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub node_id: NodeId,
    pub metric: MetricKind,
    pub value: f64,
    pub observed_at: DateTime<Utc>,
}

/// Mutable latest-reading store, owned by the evaluator.
#[derive(Debug, Default)]
pub struct ReadingCache {
    current: HashMap<(NodeId, MetricKind), Reading>,
}

impl ReadingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the current reading for the reading's (node, metric) key.
    pub fn update(&mut self, reading: Reading) {
        self.current
            .insert((reading.node_id.clone(), reading.metric), reading);
    }

    /// Current readings for one node, any metric.
    pub fn current_for<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Reading> {
        self.current
            .iter()
            .filter(move |((node, _), _)| node == id)
            .map(|(_, reading)| reading)
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Stable view for one evaluation tick.
    pub fn snapshot(&self) -> ReadingSnapshot {
        ReadingSnapshot {
            current: self.current.clone(),
        }
    }
}

/// Immutable view of the cache taken at tick start.
#[derive(Clone, Debug)]
pub struct ReadingSnapshot {
    current: HashMap<(NodeId, MetricKind), Reading>,
}

impl ReadingSnapshot {
    pub fn current_for<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Reading> {
        self.current
            .iter()
            .filter(move |((node, _), _)| node == id)
            .map(|(_, reading)| reading)
    }

    pub fn get(&self, id: &NodeId, metric: MetricKind) -> Option<&Reading> {
        self.current.get(&(id.clone(), metric))
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(node: &str, metric: MetricKind, value: f64) -> Reading {
        Reading {
            node_id: node.into(),
            metric,
            value,
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn update_overwrites_same_key() {
        let mut cache = ReadingCache::new();
        cache.update(reading("a", MetricKind::Temperature, 50.0));
        cache.update(reading("a", MetricKind::Temperature, 95.0));

        let id = NodeId::from("a");
        let values: Vec<f64> = cache.current_for(&id).map(|r| r.value).collect();
        assert_eq!(values, vec![95.0]);
    }

    #[test]
    fn distinct_metrics_coexist_per_node() {
        let mut cache = ReadingCache::new();
        cache.update(reading("a", MetricKind::Temperature, 50.0));
        cache.update(reading("a", MetricKind::Load, 60.0));

        let id = NodeId::from("a");
        assert_eq!(cache.current_for(&id).count(), 2);
    }

    #[test]
    fn node_without_readings_yields_nothing() {
        let cache = ReadingCache::new();
        let id = NodeId::from("silent");
        assert_eq!(cache.current_for(&id).count(), 0);
    }

    #[test]
    fn snapshot_is_isolated_from_later_updates() {
        let mut cache = ReadingCache::new();
        cache.update(reading("a", MetricKind::Fuel, 80.0));

        let snapshot = cache.snapshot();
        cache.update(reading("a", MetricKind::Fuel, 10.0));

        let id = NodeId::from("a");
        assert_eq!(
            snapshot.get(&id, MetricKind::Fuel).map(|r| r.value),
            Some(80.0)
        );
    }

    #[test]
    fn metric_kind_wire_names_round_trip() {
        for kind in [MetricKind::Temperature, MetricKind::Load, MetricKind::Fuel] {
            assert_eq!(MetricKind::from_wire(kind.wire_name()), Some(kind));
        }
        assert_eq!(MetricKind::from_wire("voltage"), None);
    }
}
