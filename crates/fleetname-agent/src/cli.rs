use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use fleetname_model::SettleWindow;
use fleetname_observe::LogFormat;

/// Assign a fleet-unique `Name` tag to an instance.
///
/// Exactly one naming scheme must be given: a literal name, a name prefix, or the
/// instance's scaling group as prefix.
#[derive(Debug, Parser)]
#[command(name = "fleetname", version)]
#[command(group(
    ArgGroup::new("scheme")
        .args(["name", "name_prefix", "name_prefix_group"])
        .multiple(false)
))]
pub struct Cli {
    /// Directory identifier of the instance to name
    pub instance_id: String,

    /// Use this value as the instance name
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Allocate the first free `<PREFIX><n>` across the fleet
    #[arg(short = 'p', long, alias = "namePrefix")]
    pub name_prefix: Option<String>,

    /// Use the instance's scaling group name as prefix
    #[arg(short = 'a', long, alias = "namePrefixAsg")]
    pub name_prefix_group: bool,

    /// Replace a name the instance already carries
    #[arg(long)]
    pub overwrite: bool,

    /// Max failed attempts while allocating a prefixed name [default: 10]
    #[arg(short = 'r', long)]
    pub retries: Option<u32>,

    /// Log progress (info level)
    #[arg(long)]
    pub verbose: bool,

    /// Log everything (debug level)
    #[arg(long)]
    pub debug: bool,

    /// Root folder of the file-backed instance directory
    #[arg(long, env = "FLEETNAME_STORE")]
    pub store: Option<PathBuf>,

    /// Wait window in milliseconds between writing and verifying a name [default: 1000..10000]
    #[arg(long, value_name = "MIN..MAX")]
    pub settle_window: Option<SettleWindow>,

    /// Give up after this many seconds
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    /// Write prometheus text exposition here on exit
    #[arg(long)]
    pub metrics_file: Option<PathBuf>,

    /// Console log format: text, json or journald
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Append debug-level logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// JSON configuration file; flags take precedence over its values
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
}
