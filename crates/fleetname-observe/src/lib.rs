//! Logging bootstrap for fleetname binaries.
//!
//! Installs a global `tracing` subscriber writing to stderr (text or JSON) or journald,
//! optionally mirrored at debug level into an append-only log file.
mod config;
mod error;
mod format;
mod init;
mod level;
mod timer;

pub use config::LogConfig;
pub use error::{LogError, LogResult};
pub use format::LogFormat;
pub use init::init_logger;
pub use level::LogLevel;
pub use timer::{LogTimeZone, init_local_offset};
