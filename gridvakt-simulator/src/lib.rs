/*!
# Gridvakt Simulator

Deterministic telemetry generation and replay for the cascading-risk
engine. A seeded RNG drives per-node random walks (temperature and load
drift, generator fuel drains), a virtual clock stamps each batch, and a
BLAKE3 hasher folds every emitted reading into a state hash so two runs
with the same seed are provably identical.

## Key Components:
- **TelemetryGenerator:** seeded per-node random walk over the topology.
- **Virtual Clock:** simulated time with nanosecond precision.
- **State Hashing:** BLAKE3 digest of everything emitted, for replay checks.
- **Scenario:** recorded batches, serializable for deterministic replay.
*/

use std::collections::HashMap;

use blake3::Hasher;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use gridvakt_config::SimulatorConfig;
use gridvakt_core::events::{ReadingBatch, TelemetryEvent};
use gridvakt_core::readings::MetricKind;
use gridvakt_core::time::VirtualClock;
use gridvakt_core::topology::{NodeId, NodeKind, Topology};

pub mod scenario;

struct NodeState {
    kind: NodeKind,
    temperature: f64,
    load: f64,
    fuel: f64,
}

/// Seeded telemetry generator. One instance produces the full feed for a
/// monitoring session; batches are deterministic for a given seed and
/// topology.
pub struct TelemetryGenerator {
    rng: SmallRng,
    clock: VirtualClock,
    tick_ns: u64,
    volatility: f64,
    fuel_drain: f64,
    order: Vec<NodeId>,
    state: HashMap<NodeId, NodeState>,
    hasher: Hasher,
}

impl TelemetryGenerator {
    pub fn new(config: &SimulatorConfig, topology: &Topology) -> Self {
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut order = Vec::with_capacity(topology.len());
        let mut state = HashMap::with_capacity(topology.len());
        for node in topology.all_nodes() {
            order.push(node.id.clone());
            state.insert(
                node.id.clone(),
                NodeState {
                    kind: node.kind,
                    temperature: rng.random_range(35.0..65.0),
                    load: rng.random_range(40.0..70.0),
                    fuel: 100.0,
                },
            );
        }
        Self {
            rng,
            clock: VirtualClock::new(config.seed.wrapping_mul(1_000_000_000)),
            tick_ns: config.tick_ms * 1_000_000,
            volatility: config.volatility,
            fuel_drain: config.fuel_drain,
            order,
            state,
            hasher: Hasher::new(),
        }
    }

    /// Advances virtual time one tick and emits a reading batch covering
    /// every node.
    pub fn next_batch(&mut self) -> ReadingBatch {
        self.clock.advance(self.tick_ns);
        let now = self.clock.now_utc();

        let mut batch = Vec::new();
        for id in &self.order {
            let node = self
                .state
                .get_mut(id)
                .expect("generator state covers every topology node");

            // Upward-biased drift so failures eventually occur.
            let step = self.volatility;
            node.temperature =
                (node.temperature + self.rng.random_range(-step * 0.8..step)).clamp(0.0, 120.0);
            node.load = (node.load + self.rng.random_range(-step * 0.8..step)).clamp(0.0, 120.0);

            batch.push(TelemetryEvent::new(
                id.as_str(),
                MetricKind::Temperature,
                node.temperature,
                now,
            ));
            batch.push(TelemetryEvent::new(
                id.as_str(),
                MetricKind::Load,
                node.load,
                now,
            ));

            if node.kind == NodeKind::Generator {
                node.fuel = (node.fuel - self.fuel_drain).max(0.0);
                if node.fuel <= 1.0 {
                    // Refueled between ticks.
                    node.fuel = 100.0;
                }
                batch.push(TelemetryEvent::new(
                    id.as_str(),
                    MetricKind::Fuel,
                    node.fuel,
                    now,
                ));
            }
        }

        for event in &batch {
            self.hasher.update(event.id.as_bytes());
            self.hasher.update(event.metric_kind.as_bytes());
            self.hasher.update(&event.value.to_bits().to_le_bytes());
        }
        batch
    }

    /// Hex digest of everything emitted so far.
    pub fn state_hash(&self) -> String {
        hex::encode(self.hasher.finalize().as_bytes())
    }

    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }
}
