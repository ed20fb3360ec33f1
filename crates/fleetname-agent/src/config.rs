use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use fleetname_model::{DEFAULT_RETRIES, SettleWindow};
use fleetname_observe::{LogConfig, LogLevel};

use crate::cli::Cli;

/// Default root of the file-backed instance directory.
pub const DEFAULT_STORE: &str = "/var/lib/fleetname/directory";

/// Agent configuration: JSON file values, overridden by command-line flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub logger: LogConfig,
    pub store: PathBuf,
    pub retries: u32,
    pub settle: SettleWindow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_file: Option<PathBuf>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            logger: LogConfig::default(),
            store: PathBuf::from(DEFAULT_STORE),
            retries: DEFAULT_RETRIES,
            settle: SettleWindow::default(),
            deadline_secs: None,
            metrics_file: None,
        }
    }
}

impl AgentConfig {
    /// Read a JSON configuration file.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let raw = std::fs::read(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let cfg: Self = serde_json::from_slice(&raw)
            .with_context(|| format!("invalid config {}", path.display()))?;
        cfg.settle.validate()?;
        Ok(cfg)
    }

    /// Build the effective configuration for an invocation.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut cfg = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        cfg.apply_cli(cli);
        Ok(cfg)
    }

    /// Overlay flags that were given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.verbose || cli.debug {
            self.logger.level = LogLevel::from_verbosity(cli.verbose, cli.debug);
        }
        if let Some(format) = cli.log_format {
            self.logger.format = format;
        }
        if let Some(file) = &cli.log_file {
            self.logger.file = Some(file.clone());
        }
        if let Some(store) = &cli.store {
            self.store = store.clone();
        }
        if let Some(retries) = cli.retries {
            self.retries = retries;
        }
        if let Some(settle) = cli.settle_window {
            self.settle = settle;
        }
        if let Some(secs) = cli.deadline_secs {
            self.deadline_secs = Some(secs);
        }
        if let Some(path) = &cli.metrics_file {
            self.metrics_file = Some(path.clone());
        }
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}
