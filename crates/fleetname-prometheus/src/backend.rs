use std::{io, path::Path, sync::Arc};

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};

use fleetname_core::{AllocationOutcome, AttemptOutcome, MetricsBackend};
use fleetname_model::PolicyKind;

const NAMESPACE: &str = "fleetname";

/// Prometheus metrics backend.
///
/// ## Label cardinality
/// All labels are bounded:
/// - `outcome` (attempts): "won", "collision", "miss", "io"
/// - `policy`: "explicit", "prefix", "group_prefix"
/// - `outcome` (allocations): "success", "not_found", "already_named", "no_group", "exhausted", "cancelled", "invalid", "failed"
#[derive(Clone)]
pub struct PrometheusMetrics {
    attempts: CounterVec,
    allocations: CounterVec,
    allocation_duration: HistogramVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a new prometheus metrics backend with custom registry.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let attempts = CounterVec::new(
            Opts::new("attempts_total", "Judged allocation attempts").namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(attempts.clone()))?;

        let allocations = CounterVec::new(
            Opts::new("allocations_total", "Finished naming requests").namespace(NAMESPACE),
            &["policy", "outcome"],
        )?;
        registry.register(Box::new(allocations.clone()))?;

        // settle waits dominate, 1..10s each
        let allocation_duration = HistogramVec::new(
            HistogramOpts::new(
                "allocation_duration_seconds",
                "Wall time of naming requests in seconds",
            )
            .namespace(NAMESPACE)
            .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 40.0, 80.0, 160.0]),
            &["policy"],
        )?;
        registry.register(Box::new(allocation_duration.clone()))?;

        Ok(Self {
            attempts,
            allocations,
            allocation_duration,
            registry,
        })
    }

    /// Create a new prometheus metrics backend with its own registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metric families.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render all metrics in the text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Write the text exposition to `path` atomically (temp file + rename),
    /// as expected by textfile collectors.
    pub fn write_textfile(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let body = self.render().map_err(io::Error::other)?;

        let tmp = path.with_extension("prom.tmp");
        std::fs::write(&tmp, body)?;
        std::fs::rename(&tmp, path)
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_attempt(&self, outcome: AttemptOutcome) {
        self.attempts.with_label_values(&[outcome.as_label()]).inc();
    }

    fn record_allocation(&self, policy: PolicyKind, outcome: AllocationOutcome, duration_ms: u64) {
        self.allocations
            .with_label_values(&[policy.as_label(), outcome.as_label()])
            .inc();

        let duration_seconds = duration_ms as f64 / 1000.0;
        self.allocation_duration
            .with_label_values(&[policy.as_label()])
            .observe(duration_seconds);
    }
}
