use std::sync::Arc;

use fleetname_model::PolicyKind;

/// Result of a single write-settle-verify attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Candidate observed exactly once after the write.
    Won,
    /// Candidate observed on more than one instance.
    Collision,
    /// Candidate not observed at all after the write.
    Miss,
    /// Directory call failed during the attempt.
    Io,
}

impl AttemptOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            AttemptOutcome::Won => "won",
            AttemptOutcome::Collision => "collision",
            AttemptOutcome::Miss => "miss",
            AttemptOutcome::Io => "io",
        }
    }
}

/// Terminal outcome of a naming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationOutcome {
    Success,
    NotFound,
    AlreadyNamed,
    NoGroup,
    Exhausted,
    Cancelled,
    Invalid,
    Failed,
}

impl AllocationOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            AllocationOutcome::Success => "success",
            AllocationOutcome::NotFound => "not_found",
            AllocationOutcome::AlreadyNamed => "already_named",
            AllocationOutcome::NoGroup => "no_group",
            AllocationOutcome::Exhausted => "exhausted",
            AllocationOutcome::Cancelled => "cancelled",
            AllocationOutcome::Invalid => "invalid",
            AllocationOutcome::Failed => "failed",
        }
    }
}

/// Backend metrics collection interface.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record the judgment of one allocation attempt.
    ///
    /// Candidates skipped at selection time are not attempts and are not recorded.
    fn record_attempt(&self, outcome: AttemptOutcome);

    /// Record the end of a naming request.
    ///
    /// # Arguments
    /// - `policy`: naming policy the request used
    /// - `outcome`: how the request terminated
    /// - `duration_ms`: wall time of the whole request, settle waits included
    fn record_allocation(&self, policy: PolicyKind, outcome: AllocationOutcome, duration_ms: u64);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
