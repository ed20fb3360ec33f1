use std::fmt;

use crate::{
    directory::DirectoryHandle,
    metrics::{self, MetricsHandle},
    settle::{self, SettleHandle},
};

/// Collaborators handed to the naming engine.
///
/// The directory is mandatory; settle source and metrics default to
/// [`crate::RandomSettle`] and [`crate::NoOpMetrics`].
#[derive(Clone)]
pub struct EngineContext {
    directory: DirectoryHandle,
    settle: SettleHandle,
    metrics: MetricsHandle,
}

impl EngineContext {
    /// Create a context over the given directory with default settle and metrics.
    pub fn new(directory: DirectoryHandle) -> Self {
        Self {
            directory,
            settle: settle::random_settle(),
            metrics: metrics::noop_metrics(),
        }
    }

    pub fn directory(&self) -> &DirectoryHandle {
        &self.directory
    }

    pub fn settle(&self) -> &SettleHandle {
        &self.settle
    }

    /// Get a clonable handle to the metrics backend.
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    /// Replace the settle source and return updated context.
    pub fn with_settle(mut self, settle: SettleHandle) -> Self {
        self.settle = settle;
        self
    }

    /// Replace the metrics backend and return updated context.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }
}

impl fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineContext")
            .field("directory", &self.directory.name())
            .field("settle", &"<handle>")
            .field("metrics", &"<handle>")
            .finish()
    }
}

impl fmt::Display for EngineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EngineContext(directory={})", self.directory.name())
    }
}
