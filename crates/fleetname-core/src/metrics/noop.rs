use fleetname_model::PolicyKind;

use crate::metrics::backend::{AllocationOutcome, AttemptOutcome, MetricsBackend};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_attempt(&self, _: AttemptOutcome) {}

    #[inline(always)]
    fn record_allocation(&self, _: PolicyKind, _: AllocationOutcome, _: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_metrics_is_zero_size() {
        assert_eq!(std::mem::size_of::<NoOpMetrics>(), 0);
    }
}
