use std::{fmt, str::FromStr, sync::OnceLock};

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

use crate::error::LogError;

/// Local offset captured once per process.
static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Timezone of log timestamps.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogTimeZone {
    #[default]
    Utc,
    Local,
}

impl FromStr for LogTimeZone {
    type Err = LogError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(LogError::InvalidTimeZone(s.to_string())),
        }
    }
}

impl fmt::Display for LogTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogTimeZone::Utc => "utc",
            LogTimeZone::Local => "local",
        })
    }
}

/// Capture the local UTC offset.
///
/// **Call in `main()` before starting the tokio runtime**: offset detection fails once
/// the process is multi-threaded on most Unix platforms. Falls back to UTC.
pub fn init_local_offset() -> UtcOffset {
    *LOCAL_OFFSET.get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
}

/// RFC3339 timestamp formatter for the configured timezone.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LogTimer {
    tz: LogTimeZone,
}

impl LogTimer {
    pub(crate) fn new(tz: LogTimeZone) -> Self {
        Self { tz }
    }

    fn now(&self) -> OffsetDateTime {
        let utc = OffsetDateTime::now_utc();
        match self.tz {
            LogTimeZone::Utc => utc,
            LogTimeZone::Local => utc.to_offset(init_local_offset()),
        }
    }
}

impl FormatTime for LogTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        match self.now().format(&Rfc3339) {
            Ok(ts) => write!(w, "{ts}"),
            Err(_) => write!(w, "<invalid-time>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitive() {
        assert_eq!("UTC".parse::<LogTimeZone>().unwrap(), LogTimeZone::Utc);
        assert_eq!("Local".parse::<LogTimeZone>().unwrap(), LogTimeZone::Local);
        assert!(matches!(
            "mars".parse::<LogTimeZone>(),
            Err(LogError::InvalidTimeZone(_))
        ));
    }

    #[test]
    fn utc_timer_formats_with_zulu_offset() {
        let mut buf = String::new();
        LogTimer::new(LogTimeZone::Utc)
            .format_time(&mut Writer::new(&mut buf))
            .unwrap();

        assert!(buf.ends_with('Z'), "unexpected timestamp {buf}");
        assert!(buf.contains('T'), "unexpected timestamp {buf}");
    }

    #[test]
    fn local_offset_is_cached() {
        assert_eq!(init_local_offset(), init_local_offset());
    }
}
