//! Wire-level telemetry events.
//!
//! Telemetry arrives as batches of loosely-typed events; decoding favors
//! availability over strictness. An event with an unknown metric kind or a
//! non-finite value is dropped and the batch continues.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::readings::{MetricKind, Reading};
use crate::topology::NodeId;

/// One telemetry event as delivered by the transport.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEvent {
    pub id: String,
    pub value: f64,
    pub metric_kind: String,
    pub timestamp: DateTime<Utc>,
}

impl TelemetryEvent {
    pub fn new(id: impl Into<String>, metric: MetricKind, value: f64, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            value,
            metric_kind: metric.wire_name().to_owned(),
            timestamp: at,
        }
    }

    /// Decodes the event into a typed reading. `None` means the event is
    /// malformed and should be dropped.
    pub fn into_reading(self) -> Option<Reading> {
        let Some(metric) = MetricKind::from_wire(&self.metric_kind) else {
            debug!(node = %self.id, kind = %self.metric_kind, "dropping unknown metric kind");
            return None;
        };
        if !self.value.is_finite() {
            debug!(node = %self.id, kind = %self.metric_kind, "dropping non-finite value");
            return None;
        }
        Some(Reading {
            node_id: NodeId::from(self.id),
            metric,
            value: self.value,
            observed_at: self.timestamp,
        })
    }
}

/// One tick's worth of telemetry.
pub type ReadingBatch = Vec<TelemetryEvent>;
