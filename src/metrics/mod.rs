//! Prometheus metrics for master lookups
//!
//! [`ProbeMetrics`] is a [`ProbeObserver`]: attach it to a
//! [`MasterFinder`](crate::probe::MasterFinder) and every probed host is
//! counted and timed by outcome.

use std::time::Duration;

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

use crate::probe::{ProbeObserver, ProbeOutcome};

/// Probe metrics collection
pub struct ProbeMetrics {
    /// Registry for all metrics
    pub registry: Registry,
    /// Probed hosts by outcome
    pub probes_total: IntCounterVec,
    /// Time spent per probed host (seconds)
    pub probe_duration_seconds: HistogramVec,
}

impl ProbeMetrics {
    /// Create a new collection with its own registry
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::with_registry(Registry::new())
    }

    /// Create and register into an existing registry
    pub fn with_registry(registry: Registry) -> Result<Self, prometheus::Error> {
        let probes_total = IntCounterVec::new(
            Opts::new("pgmaster_probes_total", "Total number of probed hosts"),
            &["outcome"], // master, replica, connect_failed, ping_failed, query_failed, timed_out
        )?;

        let probe_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "pgmaster_probe_duration_seconds",
                "Time spent probing a single host in seconds",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
            ]),
            &["outcome"],
        )?;

        registry.register(Box::new(probes_total.clone()))?;
        registry.register(Box::new(probe_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            probes_total,
            probe_duration_seconds,
        })
    }

    /// Record one probed host
    pub fn record_probe(&self, outcome: &ProbeOutcome, elapsed: Duration) {
        let label = outcome.label();
        self.probes_total.with_label_values(&[label]).inc();
        self.probe_duration_seconds
            .with_label_values(&[label])
            .observe(elapsed.as_secs_f64());
    }

    /// Get metrics as Prometheus text format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl ProbeObserver for ProbeMetrics {
    fn observe(&self, _host: &str, outcome: &ProbeOutcome, elapsed: Duration) {
        self.record_probe(outcome, elapsed);
    }
}
