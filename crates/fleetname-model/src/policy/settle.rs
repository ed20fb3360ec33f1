use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Bounds of the randomized wait between writing a candidate name and re-reading the directory.
///
/// Competing instances that wrote at the same instant pick different delays from this window,
/// so their verification reads are unlikely to coincide. Both bounds are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleWindow {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl SettleWindow {
    pub const DEFAULT_MIN_MS: u64 = 1_000;
    pub const DEFAULT_MAX_MS: u64 = 10_000;

    pub fn new(min_ms: u64, max_ms: u64) -> ModelResult<Self> {
        let w = Self { min_ms, max_ms };
        w.validate()?;
        Ok(w)
    }

    /// Window collapsed to zero; used by tests and dry runs.
    pub const fn immediate() -> Self {
        Self {
            min_ms: 0,
            max_ms: 0,
        }
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.min_ms > self.max_ms {
            return Err(ModelError::InvalidSettleWindow(format!(
                "min {}ms is greater than max {}ms",
                self.min_ms, self.max_ms
            )));
        }
        Ok(())
    }

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

impl Default for SettleWindow {
    fn default() -> Self {
        Self {
            min_ms: Self::DEFAULT_MIN_MS,
            max_ms: Self::DEFAULT_MAX_MS,
        }
    }
}

/// Parses `"MIN..MAX"` in milliseconds, or a single value for a fixed delay.
///
/// # Examples
/// ```
/// use fleetname_model::SettleWindow;
///
/// let w: SettleWindow = "250..1500".parse().unwrap();
/// assert_eq!((w.min_ms, w.max_ms), (250, 1500));
/// assert_eq!("0".parse::<SettleWindow>().unwrap(), SettleWindow::immediate());
/// assert!("9..1".parse::<SettleWindow>().is_err());
/// ```
impl FromStr for SettleWindow {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        let s = s.trim();
        let parse = |v: &str| {
            v.trim()
                .parse::<u64>()
                .map_err(|e| ModelError::InvalidSettleWindow(format!("{s:?}: {e}")))
        };

        match s.split_once("..") {
            Some((min, max)) => Self::new(parse(min)?, parse(max)?),
            None => {
                let fixed = parse(s)?;
                Self::new(fixed, fixed)
            }
        }
    }
}

impl fmt::Display for SettleWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min_ms, self.max_ms)
    }
}
