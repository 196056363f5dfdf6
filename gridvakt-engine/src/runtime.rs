/*!
# Runtime Engine

Core runtime for gridvakt: the `RiskEngine` evaluator plus the live,
simulation, and replay entrypoints shared by all frontends. One evaluation
tick runs detection and propagation against a stable snapshot of the
reading cache, then hands the report to the alert lifecycle manager.
*/

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use opentelemetry::KeyValue;
use tracing::{debug, info, instrument};

use gridvakt_alerts::{Alert, AlertEvent, AlertManager, AlertSink, TracingSink};
use gridvakt_config::GridvaktConfig;
use gridvakt_core::channel::{telemetry_channel, BatchReceiver};
use gridvakt_core::events::ReadingBatch;
use gridvakt_core::readings::ReadingCache;
use gridvakt_core::topology::{Topology, TopologyDescription};
use gridvakt_detection::{classify_snapshot, propagate, CascadeReport, ThresholdTable};
use gridvakt_simulator::scenario::Scenario;
use gridvakt_simulator::TelemetryGenerator;
use gridvakt_telemetry::{EventLogger, MetricsRecorder};

use crate::error::EngineError;

/// Sink wrapper that keeps Prometheus counters in step with lifecycle
/// events before forwarding them.
struct MeteredSink {
    inner: Arc<dyn AlertSink>,
    metrics: MetricsRecorder,
}

impl AlertSink for MeteredSink {
    fn publish(&self, event: &AlertEvent) {
        if matches!(event, AlertEvent::Raised(_)) {
            self.metrics.alerts_raised_total.inc();
        }
        self.inner.publish(event);
    }
}

/// Single-evaluator engine state: topology, reading cache, alert set.
pub struct RiskEngine {
    topology: Arc<Topology>,
    cache: ReadingCache,
    thresholds: ThresholdTable,
    alerts: AlertManager,
    metrics: MetricsRecorder,
}

impl RiskEngine {
    pub fn new(
        topology: Arc<Topology>,
        config: &GridvaktConfig,
        sink: Arc<dyn AlertSink>,
        metrics: MetricsRecorder,
    ) -> Self {
        let metered = Arc::new(MeteredSink {
            inner: sink,
            metrics: metrics.clone(),
        });
        Self {
            thresholds: config.monitor.thresholds.to_table(),
            alerts: AlertManager::new(
                metered,
                Duration::from_millis(config.monitor.grace_period_ms),
            ),
            topology,
            cache: ReadingCache::new(),
            metrics,
        }
    }

    /// Applies one telemetry batch to the reading cache. Malformed events
    /// and readings for unknown nodes are dropped; ingestion never fails.
    #[instrument(level = "debug", name = "ingest_batch", skip(self, batch))]
    pub fn ingest(&mut self, batch: ReadingBatch) -> usize {
        let mut accepted = 0;
        for event in batch {
            let Some(reading) = event.into_reading() else {
                self.metrics.dropped_events_total.inc();
                continue;
            };
            if !self.topology.contains(&reading.node_id) {
                debug!(node = %reading.node_id, "dropping reading for unknown node");
                self.metrics.dropped_events_total.inc();
                continue;
            }
            self.cache.update(reading);
            self.metrics.readings_total.inc();
            accepted += 1;
        }
        accepted
    }

    /// Runs one evaluation tick: snapshot, classify, propagate, update the
    /// alert set. Returns the propagation report for callers that want it.
    #[instrument(level = "debug", name = "evaluation_tick", skip(self))]
    pub fn tick(&mut self, now: DateTime<Utc>) -> CascadeReport {
        let snapshot = self.cache.snapshot();

        let started = Instant::now();
        let failing = classify_snapshot(&self.topology, &snapshot, &self.thresholds);
        let report = propagate(&self.topology, &failing);
        self.metrics
            .evaluation_latency
            .observe(started.elapsed().as_nanos() as f64);

        self.alerts.evaluate(&self.topology, &report, now);
        self.metrics
            .active_alerts
            .set(self.alerts.active_len() as f64);
        report
    }

    pub fn active_alerts(&self) -> Vec<Alert> {
        self.alerts.active_alerts()
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }
}

/// Loads and validates a topology from a JSON graph description file.
pub fn load_topology_file(path: impl AsRef<Path>) -> Result<Topology, EngineError> {
    let raw = std::fs::read_to_string(path)?;
    let description: TopologyDescription = serde_json::from_str(&raw)?;
    Ok(Topology::load(description)?)
}

/// Drains batches from the telemetry channel until the producer is gone.
/// Each batch is one evaluation tick; the channel's readiness handshake
/// means the next batch is only requested once this one is done.
pub async fn drain_channel(engine: &mut RiskEngine, receiver: &mut BatchReceiver) {
    while let Some(batch) = receiver.recv().await {
        engine.ingest(batch);
        engine.tick(Utc::now());
    }
}

/// Runs the live mode: a generator task feeds the engine through the
/// bounded channel at the configured cadence. Stands in for a network
/// telemetry source, which plugs into the same channel.
#[instrument(level = "info", name = "run_live_mode", skip(config, topology, metrics))]
pub async fn run_live_mode(
    config: &GridvaktConfig,
    topology: Arc<Topology>,
    max_ticks: Option<u64>,
    metrics: MetricsRecorder,
) -> Result<(), EngineError> {
    let (mut sender, mut receiver) = telemetry_channel(config.engine.channel_capacity);
    let mut generator = TelemetryGenerator::new(&config.simulator, &topology);
    let cadence = Duration::from_millis(config.engine.tick_interval_ms);

    info!(nodes = topology.len(), "starting live evaluation loop");
    let producer = tokio::spawn(async move {
        let mut produced = 0u64;
        while max_ticks.map_or(true, |limit| produced < limit) {
            let batch = generator.next_batch();
            if sender.feed(batch).await.is_err() {
                break;
            }
            produced += 1;
            tokio::time::sleep(cadence).await;
        }
    });

    let mut engine = RiskEngine::new(topology, config, Arc::new(TracingSink), metrics);
    drain_channel(&mut engine, &mut receiver).await;
    producer.await?;

    EventLogger::log_event(
        "run_complete",
        vec![KeyValue::new(
            "active_alerts",
            engine.active_alerts().len().to_string(),
        )],
    )
    .await;
    Ok(())
}

/// Runs a deterministic simulation for a fixed number of ticks and returns
/// the generator's final state hash.
#[instrument(
    level = "info",
    name = "run_simulation_mode",
    skip(config, topology, metrics)
)]
pub async fn run_simulation_mode(
    config: &GridvaktConfig,
    topology: Arc<Topology>,
    ticks: usize,
    validate_hash: Option<&str>,
    metrics: MetricsRecorder,
) -> Result<String, EngineError> {
    let mut engine = RiskEngine::new(topology.clone(), config, Arc::new(TracingSink), metrics);
    let mut generator = TelemetryGenerator::new(&config.simulator, &topology);

    for _ in 0..ticks {
        let batch = generator.next_batch();
        let now = generator.clock().now_utc();
        engine.ingest(batch);
        engine.tick(now);
    }

    let final_hash = generator.state_hash();
    if let Some(expected) = validate_hash {
        if final_hash != expected {
            return Err(EngineError::HashMismatch {
                expected: expected.to_owned(),
                actual: final_hash,
            });
        }
    }

    info!("Simulation complete. State hash: {}", final_hash);
    EventLogger::log_event(
        "simulation_complete",
        vec![
            KeyValue::new("ticks", ticks.to_string()),
            KeyValue::new("seed", config.simulator.seed.to_string()),
            KeyValue::new("final_hash", final_hash.clone()),
        ],
    )
    .await;
    Ok(final_hash)
}

/// Replays a recorded scenario through the engine.
#[instrument(
    level = "info",
    name = "run_replay_mode",
    skip(config, topology, metrics)
)]
pub async fn run_replay_mode(
    config: &GridvaktConfig,
    topology: Arc<Topology>,
    scenario_path: impl AsRef<Path> + std::fmt::Debug,
    metrics: MetricsRecorder,
) -> Result<(), EngineError> {
    let scenario = Scenario::load_from_file(scenario_path)?;
    let mut engine = RiskEngine::new(topology, config, Arc::new(TracingSink), metrics);

    let ticks = scenario.batches.len();
    for batch in scenario.replay() {
        let now = batch
            .first()
            .map(|event| event.timestamp)
            .unwrap_or_else(Utc::now);
        engine.ingest(batch);
        engine.tick(now);
    }

    EventLogger::log_event(
        "replay_complete",
        vec![
            KeyValue::new("seed", scenario.seed.to_string()),
            KeyValue::new("ticks", ticks.to_string()),
        ],
    )
    .await;
    Ok(())
}
