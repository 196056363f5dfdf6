//! Alert sinks.
//!
//! The lifecycle manager publishes events through a sink trait so the
//! surrounding layers (log output, UI feeds, tests) stay pluggable.
//! Publishing must not block; sinks that forward elsewhere buffer or drop.

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{info, warn};

use gridvakt_detection::Severity;

use crate::alert::AlertEvent;

pub trait AlertSink: Send + Sync {
    fn publish(&self, event: &AlertEvent);
}

/// Logs every lifecycle event through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl AlertSink for TracingSink {
    fn publish(&self, event: &AlertEvent) {
        let alert = event.alert();
        match alert.severity {
            Severity::Critical => warn!(
                event = event.name(),
                source = %alert.key.source,
                victim = alert.key.victim.as_ref().map(|v| v.as_str()),
                "{}",
                alert.message
            ),
            Severity::Warning => info!(
                event = event.name(),
                source = %alert.key.source,
                victim = alert.key.victim.as_ref().map(|v| v.as_str()),
                "{}",
                alert.message
            ),
        }
    }
}

/// Collects events in memory. Test helper.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<AlertEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().clone()
    }

    pub fn take(&self) -> Vec<AlertEvent> {
        std::mem::take(&mut self.events.lock())
    }
}

impl AlertSink for MemorySink {
    fn publish(&self, event: &AlertEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Forwards events over an unbounded channel to an external consumer.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<AlertEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AlertEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl AlertSink for ChannelSink {
    fn publish(&self, event: &AlertEvent) {
        // A gone consumer is not the engine's problem.
        let _ = self.tx.send(event.clone());
    }
}
