//! Naming engine: looks the target up, resolves the policy and, for prefix
//! policies, drives the allocation loop until the name is owned or the budget is gone.
mod allocate;

mod attempt;
pub use attempt::AttemptError;

mod resolve;
pub use resolve::{Resolution, resolve};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use fleetname_model::{Filter, Instance, NAME_TAG, NamingRequest};

use crate::{context::EngineContext, error::CoreError, metrics::AllocationOutcome};

use allocate::Allocator;

/// Assigns a fleet-unique name to one instance per call.
///
/// The engine holds no state between calls; concurrency only ever comes from several
/// engines (usually several processes) sharing one directory.
#[derive(Debug, Clone)]
pub struct NamingEngine {
    ctx: EngineContext,
}

impl NamingEngine {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Name the instance described by `req` and return the final name.
    ///
    /// `cancel` aborts a pending settle wait (or a not yet started round) with
    /// [`CoreError::Cancelled`].
    pub async fn name_instance(
        &self,
        req: &NamingRequest,
        cancel: &CancellationToken,
    ) -> Result<String, CoreError> {
        let started = Instant::now();
        let res = self.run(req, cancel).await;

        let outcome = match &res {
            Ok(_) => AllocationOutcome::Success,
            Err(e) => e.outcome(),
        };
        self.ctx.metrics().record_allocation(
            req.policy.kind(),
            outcome,
            started.elapsed().as_millis() as u64,
        );
        res
    }

    /// Fetch the current snapshot of a single instance.
    pub async fn lookup(&self, instance_id: &str) -> Result<Instance, CoreError> {
        let instances = self
            .ctx
            .directory()
            .list_instances(&Filter::instance_id(instance_id))
            .await?;

        instances
            .into_iter()
            .find(|i| i.id == instance_id)
            .ok_or_else(|| CoreError::InstanceNotFound {
                instance_id: instance_id.to_string(),
            })
    }

    async fn run(
        &self,
        req: &NamingRequest,
        cancel: &CancellationToken,
    ) -> Result<String, CoreError> {
        req.validate()?;

        let instance = self.lookup(&req.instance_id).await?;
        debug!(instance = ?instance, "instance");
        info!(
            instance = %instance.id,
            name = instance.tags.name().unwrap_or(""),
            policy = %req.policy.kind(),
            "instance name"
        );

        match resolve(&instance, &req.policy, req.overwrite)? {
            Resolution::Final(name) => {
                if cancel.is_cancelled() {
                    return Err(CoreError::Cancelled {
                        instance_id: instance.id,
                    });
                }
                self.ctx
                    .directory()
                    .set_tag(&instance.id, NAME_TAG, &name)
                    .await?;
                info!(instance = %instance.id, name = %name, "name set");
                Ok(name)
            }
            Resolution::Allocate { prefix } => {
                Allocator::new(
                    &self.ctx,
                    cancel,
                    &instance.id,
                    &prefix,
                    req.retries,
                    req.settle,
                )
                .run()
                .await
            }
        }
    }
}
