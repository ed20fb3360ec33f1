use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use fleetname_core::{CoreError, EngineContext, NamingEngine};
use fleetname_model::{NamingPolicy, NamingRequest};
use fleetname_prometheus::PrometheusMetrics;
use fleetname_store::FileDirectory;

use crate::{cli::Cli, config::AgentConfig};

/// Build the request from the flags and run one naming round to completion.
pub async fn run(cli: &Cli, cfg: &AgentConfig) -> anyhow::Result<String> {
    let policy = NamingPolicy::from_selectors(
        cli.name.as_deref(),
        cli.name_prefix.as_deref(),
        cli.name_prefix_group,
    )
    .map_err(CoreError::from)?;

    let request = NamingRequest::new(cli.instance_id.as_str(), policy)
        .with_overwrite(cli.overwrite)
        .with_retries(cfg.retries)
        .with_settle(cfg.settle);
    debug!(?request, store = %cfg.store.display(), "parsed invocation");

    let cancel = CancellationToken::new();
    spawn_cancel_triggers(&cancel, cfg.deadline());

    let res = name_with(&request, cfg, &cancel).await;
    cancel.cancel();
    res
}

async fn name_with(
    request: &NamingRequest,
    cfg: &AgentConfig,
    cancel: &CancellationToken,
) -> anyhow::Result<String> {
    let directory = FileDirectory::open(&cfg.store)
        .await
        .with_context(|| format!("failed to open directory store {}", cfg.store.display()))?;
    let metrics = PrometheusMetrics::new().context("failed to register metrics")?;

    let ctx = EngineContext::new(Arc::new(directory)).with_metrics(Arc::new(metrics.clone()));
    info!(%ctx, policy = %request.policy.kind(), "naming instance {}", request.instance_id);

    let res = NamingEngine::new(ctx).name_instance(request, cancel).await;

    if let Some(path) = &cfg.metrics_file {
        if let Err(e) = metrics.write_textfile(path) {
            warn!(path = %path.display(), "failed to write metrics: {e}");
        }
    }

    res.with_context(|| format!("could not name instance {}", request.instance_id))
}

/// Cancel on Ctrl-C, and once `deadline` has passed if one is set.
///
/// The triggers stop with the token.
fn spawn_cancel_triggers(cancel: &CancellationToken, deadline: Option<Duration>) {
    let token = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            sig = tokio::signal::ctrl_c() => {
                if sig.is_ok() {
                    warn!("interrupted");
                    token.cancel();
                }
            }
        }
    });

    if let Some(deadline) = deadline {
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(deadline) => {
                    warn!(?deadline, "deadline reached");
                    token.cancel();
                }
            }
        });
    }
}
