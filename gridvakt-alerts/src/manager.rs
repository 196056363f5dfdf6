//! Keyed alert state machine.
//!
//! Tick-driven evaluation and timer-driven expiry mutate the same alert
//! set, serialized behind one mutex. Every WARNING raise or renewal stamps
//! the entry with a fresh generation and spawns a sleep task carrying the
//! generation it saw; a task that wakes to a different generation lost to a
//! renewal and exits without effect. Generations come from one monotonic
//! counter, so a key that is cleared and raised again never reuses a value
//! a stale timer is still holding.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::time::Instant;

use gridvakt_core::topology::{NodeId, Topology};
use gridvakt_detection::{CascadeReport, Severity};

use crate::alert::{Alert, AlertEvent, AlertKey};
use crate::sink::AlertSink;

/// Grace period a WARNING survives without renewal in the reference
/// deployment.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(8);

struct ActiveAlert {
    alert: Alert,
    generation: u64,
}

pub struct AlertManager {
    state: Arc<Mutex<HashMap<AlertKey, ActiveAlert>>>,
    sink: Arc<dyn AlertSink>,
    grace: Duration,
    generation: AtomicU64,
}

impl AlertManager {
    pub fn new(sink: Arc<dyn AlertSink>, grace: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(HashMap::new())),
            sink,
            grace,
            generation: AtomicU64::new(0),
        }
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::Relaxed)
    }

    /// Applies one propagation report: raises new keys, renews matching
    /// ones, clears the rest. Must run inside a tokio runtime; WARNING
    /// alerts schedule their expiry here.
    pub fn evaluate(&self, topology: &Topology, report: &CascadeReport, now: DateTime<Utc>) {
        let matches = self.matching_alerts(topology, report);
        let mut active = self.state.lock();

        let mut matched_keys: HashSet<AlertKey> = HashSet::with_capacity(matches.len());
        for (key, severity, message) in matches {
            matched_keys.insert(key.clone());
            match active.get_mut(&key) {
                Some(entry) => {
                    entry.generation = self.next_generation();
                    entry.alert.severity = severity;
                    entry.alert.message = message;
                    entry.alert.last_renewed_at = now;
                    entry.alert.expires_at = self.expiry_timestamp(severity, now);
                    if severity == Severity::Warning {
                        self.schedule_expiry(key, entry.generation, Instant::now() + self.grace);
                    }
                    self.sink.publish(&AlertEvent::Renewed(entry.alert.clone()));
                }
                None => {
                    let generation = self.next_generation();
                    let alert = Alert {
                        key: key.clone(),
                        severity,
                        message,
                        raised_at: now,
                        last_renewed_at: now,
                        expires_at: self.expiry_timestamp(severity, now),
                    };
                    active.insert(
                        key.clone(),
                        ActiveAlert {
                            alert: alert.clone(),
                            generation,
                        },
                    );
                    if severity == Severity::Warning {
                        self.schedule_expiry(key, generation, Instant::now() + self.grace);
                    }
                    self.sink.publish(&AlertEvent::Raised(alert));
                }
            }
        }

        let stale: Vec<AlertKey> = active
            .keys()
            .filter(|key| !matched_keys.contains(key))
            .cloned()
            .collect();
        for key in stale {
            if let Some(entry) = active.remove(&key) {
                self.sink.publish(&AlertEvent::Cleared(entry.alert));
            }
        }
    }

    /// Current alert set, unordered.
    pub fn active_alerts(&self) -> Vec<Alert> {
        self.state
            .lock()
            .values()
            .map(|entry| entry.alert.clone())
            .collect()
    }

    pub fn active_len(&self) -> usize {
        self.state.lock().len()
    }

    fn matching_alerts(
        &self,
        topology: &Topology,
        report: &CascadeReport,
    ) -> Vec<(AlertKey, Severity, String)> {
        let mut matches = Vec::with_capacity(report.direct.len() + report.cascades.len());
        for (source, severity) in &report.direct {
            let message = format!(
                "{severity}: {} ({source}) is failing",
                topology.display_name(source)
            );
            matches.push((AlertKey::direct(source.clone()), *severity, message));
        }
        for pair in &report.cascades {
            // Cascade alerts inherit the failing source's severity.
            let severity = report
                .severity_of(&pair.source)
                .unwrap_or(Severity::Warning);
            let message = format!(
                "{severity}: {} at risk due to failure in {}",
                topology.display_name(&pair.victim),
                topology.display_name(&pair.source)
            );
            matches.push((
                AlertKey::cascade(pair.source.clone(), pair.victim.clone()),
                severity,
                message,
            ));
        }
        matches
    }

    fn expiry_timestamp(&self, severity: Severity, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match severity {
            Severity::Warning => {
                Some(now + chrono::Duration::milliseconds(self.grace.as_millis() as i64))
            }
            Severity::Critical => None,
        }
    }

    fn schedule_expiry(&self, key: AlertKey, generation: u64, deadline: Instant) {
        let state = Arc::clone(&self.state);
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let mut active = state.lock();
            let due = matches!(active.get(&key), Some(entry) if entry.generation == generation);
            if due {
                if let Some(entry) = active.remove(&key) {
                    sink.publish(&AlertEvent::Expired(entry.alert));
                }
            }
        });
    }
}

/// Convenience lookup used by the engine and tests.
impl AlertManager {
    pub fn is_active(&self, source: &NodeId, victim: Option<&NodeId>) -> bool {
        let key = match victim {
            Some(victim) => AlertKey::cascade(source.clone(), victim.clone()),
            None => AlertKey::direct(source.clone()),
        };
        self.state.lock().contains_key(&key)
    }
}
