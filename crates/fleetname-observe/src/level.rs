use std::{convert::TryFrom, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::LogError;

/// Validated `EnvFilter` expression, e.g. `"warn"` or `"fleetname_core=debug,info"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct LogLevel(String);

impl LogLevel {
    /// Validate a filter expression.
    ///
    /// # Examples
    /// ```
    /// use fleetname_observe::LogLevel;
    ///
    /// let lvl = LogLevel::new("fleetname_core=debug,warn").unwrap();
    /// assert_eq!(lvl.as_str(), "fleetname_core=debug,warn");
    /// assert!(LogLevel::new("fleetname=shout").is_err());
    /// ```
    pub fn new(s: impl Into<String>) -> Result<Self, LogError> {
        Self::try_from(s.into())
    }

    /// Level selected by the classic `--verbose` / `--debug` switches.
    ///
    /// `debug` wins over `verbose`; neither means warnings and errors only.
    ///
    /// # Examples
    /// ```
    /// use fleetname_observe::LogLevel;
    ///
    /// assert_eq!(LogLevel::from_verbosity(true, true).as_str(), "debug");
    /// assert_eq!(LogLevel::from_verbosity(true, false).as_str(), "info");
    /// assert_eq!(LogLevel::from_verbosity(false, false).as_str(), "warn");
    /// ```
    pub fn from_verbosity(verbose: bool, debug: bool) -> Self {
        let lvl = if debug {
            "debug"
        } else if verbose {
            "info"
        } else {
            "warn"
        };
        LogLevel(lvl.to_string())
    }

    /// # Examples
    /// ```
    /// use fleetname_observe::LogLevel;
    ///
    /// let lvl = "error".parse::<LogLevel>().unwrap();
    /// assert_eq!(lvl.as_str(), "error");
    /// ```
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the filter. The expression was validated on construction.
    ///
    /// # Examples
    /// ```
    /// use fleetname_observe::LogLevel;
    ///
    /// let lvl = "fleetname_store=trace,info".parse::<LogLevel>().unwrap();
    /// let _ = lvl.to_env_filter();
    /// ```
    pub fn to_env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(self.as_str()).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel("warn".to_string())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for LogLevel {
    type Error = LogError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match EnvFilter::try_new(&s) {
            Ok(_) => Ok(LogLevel(s)),
            Err(e) => Err(LogError::InvalidLevel(format!("{s}: {e}"))),
        }
    }
}

impl From<LogLevel> for String {
    fn from(l: LogLevel) -> Self {
        l.0
    }
}
