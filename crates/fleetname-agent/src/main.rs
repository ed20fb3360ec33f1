mod cli;
mod config;
mod run;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use fleetname_observe::{init_local_offset, init_logger};

use crate::{cli::Cli, config::AgentConfig};

fn main() -> ExitCode {
    // Must run before any threads are spawned.
    init_local_offset();

    let cli = Cli::parse();
    let cfg = match AgentConfig::resolve(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("fleetname: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logger(&cfg.logger) {
        eprintln!("fleetname: {e}");
        return ExitCode::FAILURE;
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run::run(&cli, &cfg)) {
        Ok(name) => {
            info!(instance = %cli.instance_id, "named {name}");
            println!("{name}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
