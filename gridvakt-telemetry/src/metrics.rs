//! Prometheus metrics for the evaluation pipeline.

use prometheus::{Counter, Gauge, Histogram, HistogramOpts, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub readings_total: Counter,
    pub dropped_events_total: Counter,
    pub evaluation_latency: Histogram,
    pub active_alerts: Gauge,
    pub alerts_raised_total: Counter,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let readings_total =
            Counter::new("gridvakt_readings_total", "Total accepted telemetry readings").unwrap();
        let dropped_events_total = Counter::new(
            "gridvakt_dropped_events_total",
            "Telemetry events dropped as malformed or unknown",
        )
        .unwrap();

        let evaluation_latency = Histogram::with_opts(
            HistogramOpts::new(
                "gridvakt_evaluation_latency_ns",
                "Detection and propagation time per tick",
            )
            .buckets(vec![1_000.0, 10_000.0, 100_000.0, 1_000_000.0]),
        )
        .unwrap();

        let active_alerts =
            Gauge::new("gridvakt_active_alerts", "Currently active alerts").unwrap();
        let alerts_raised_total =
            Counter::new("gridvakt_alerts_raised_total", "Alerts raised since start").unwrap();

        registry.register(Box::new(readings_total.clone())).unwrap();
        registry
            .register(Box::new(dropped_events_total.clone()))
            .unwrap();
        registry
            .register(Box::new(evaluation_latency.clone()))
            .unwrap();
        registry.register(Box::new(active_alerts.clone())).unwrap();
        registry
            .register(Box::new(alerts_raised_total.clone()))
            .unwrap();

        Self {
            registry,
            readings_total,
            dropped_events_total,
            evaluation_latency,
            active_alerts,
            alerts_raised_total,
        }
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap_or_default())
    }
}
