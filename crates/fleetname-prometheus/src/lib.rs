//! Prometheus metrics backend for the naming engine.
//!
//! Provides [`PrometheusMetrics`], an implementation of [`fleetname_core::MetricsBackend`].
//! Naming runs once per instance boot, so instead of serving `/metrics` the collected
//! families are usually dumped into a node-exporter textfile collector directory:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fleetname_core::{EngineContext, MemoryDirectory};
//! use fleetname_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let ctx = EngineContext::new(Arc::new(MemoryDirectory::new()))
//!     .with_metrics(Arc::new(metrics.clone()));
//! // ... run the engine with `ctx` ...
//! metrics.write_textfile("/var/lib/node_exporter/textfile/fleetname.prom")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `fleetname_attempts_total{outcome}` - Counter
//! - `fleetname_allocations_total{policy, outcome}` - Counter
//! - `fleetname_allocation_duration_seconds{policy}` - Histogram
mod backend;
pub use backend::PrometheusMetrics;
