use std::{io::IsTerminal, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{format::LogFormat, level::LogLevel, timer::LogTimeZone};

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Console sink format.
    pub format: LogFormat,
    /// Filter expression for the console sink.
    pub level: LogLevel,
    /// Timezone for timestamps.
    pub tz: LogTimeZone,
    /// Include module targets in output.
    pub with_targets: bool,
    /// Colored text output when stderr is a terminal.
    pub use_color: bool,
    /// Append-only log file receiving everything at debug level and above.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::default(),
            tz: LogTimeZone::default(),
            with_targets: false,
            use_color: true,
            file: None,
        }
    }
}

impl LogConfig {
    /// Color only when enabled and stderr (where logs go) is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stderr().is_terminal()
    }
}
