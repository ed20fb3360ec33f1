use std::{fs::OpenOptions, path::Path, sync::Mutex};

use tracing_subscriber::{
    Layer, Registry, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{
    config::LogConfig,
    error::{LogError, LogResult},
    format::LogFormat,
    timer::LogTimer,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Install the global subscriber described by `cfg`.
///
/// Console output goes to stderr so stdout stays free for command results.
/// Once installed, all `tracing` macros in the process use it; a second call fails
/// with [`LogError::AlreadyInitialized`].
///
/// For `LogTimeZone::Local`, call [`crate::init_local_offset`] before spawning threads.
///
/// # Examples
/// ```no_run
/// use fleetname_observe::{LogConfig, LogLevel, init_local_offset, init_logger};
///
/// init_local_offset();
/// let cfg = LogConfig {
///     level: LogLevel::from_verbosity(true, false),
///     ..Default::default()
/// };
/// init_logger(&cfg).unwrap();
/// tracing::info!("logger ready");
/// ```
pub fn init_logger(cfg: &LogConfig) -> LogResult<()> {
    let mut layers = vec![console_layer(cfg)?];
    if let Some(path) = &cfg.file {
        layers.push(file_layer(cfg, path)?);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|_| LogError::AlreadyInitialized)
}

fn console_layer(cfg: &LogConfig) -> LogResult<BoxedLayer> {
    let filter = cfg.level.to_env_filter();
    let timer = LogTimer::new(cfg.tz);

    let layer: BoxedLayer = match cfg.format {
        LogFormat::Text => fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(cfg.should_use_color())
            .with_target(cfg.with_targets)
            .with_timer(timer)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(cfg.with_targets)
            .with_timer(timer)
            .with_filter(filter)
            .boxed(),
        LogFormat::Journald => journald_layer()?.with_filter(filter).boxed(),
    };
    Ok(layer)
}

/// Plain-text debug sink appended to `path`.
fn file_layer(cfg: &LogConfig, path: &Path) -> LogResult<BoxedLayer> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LogError::FileOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    Ok(fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(cfg.with_targets)
        .with_timer(LogTimer::new(cfg.tz))
        .with_filter(LevelFilter::DEBUG)
        .boxed())
}

#[cfg(target_os = "linux")]
fn journald_layer() -> LogResult<tracing_journald::Layer> {
    tracing_journald::layer().map_err(|e| LogError::JournaldInitFailed(e.to_string()))
}

#[cfg(not(target_os = "linux"))]
fn journald_layer() -> LogResult<tracing_journald::Layer> {
    Err(LogError::JournaldNotSupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_layer_builds_for_text_and_json() {
        for format in [LogFormat::Text, LogFormat::Json] {
            let cfg = LogConfig {
                format,
                ..Default::default()
            };
            assert!(console_layer(&cfg).is_ok(), "{format}");
        }
    }

    #[test]
    fn file_layer_creates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("naming.log");

        assert!(file_layer(&LogConfig::default(), &path).is_ok());
        assert!(path.exists());
    }

    #[test]
    fn file_layer_reports_unwritable_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing-dir").join("naming.log");

        let Err(err) = file_layer(&LogConfig::default(), &path) else {
            panic!("expected FileOpen error for {}", path.display());
        };
        assert!(matches!(err, LogError::FileOpen { .. }));
    }
}
