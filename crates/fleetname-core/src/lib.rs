pub mod context;
pub mod directory;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod settle;

pub use context::EngineContext;
pub use directory::{Directory, DirectoryError, DirectoryHandle, MemoryDirectory};
pub use engine::{AttemptError, NamingEngine};
pub use error::CoreError;
pub use metrics::{AllocationOutcome, AttemptOutcome, MetricsBackend, MetricsHandle, NoOpMetrics};
pub use settle::{FixedSettle, RandomSettle, SettleDelay, SettleHandle};
