//! Collision-avoiding allocation loop.
//!
//! `SelectCandidate -> Write -> Settle -> Verify -> {Success | SelectCandidate | Exhausted}`
//!
//! The suffix counter only grows for the lifetime of one request, so the loop never
//! proposes a candidate twice and competing engines drift apart instead of oscillating.
//! Candidates already present in the latest snapshot are skipped for free; every judged
//! round that does not end in `Success` costs one unit of retry budget.
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use fleetname_model::{Filter, NAME_TAG, SettleWindow};

use crate::{
    context::EngineContext,
    directory::{DirectoryError, count_name, instance_names},
    engine::attempt::{Attempt, AttemptError},
    error::CoreError,
    metrics::AttemptOutcome,
};

#[derive(Debug)]
pub(crate) enum AllocationState {
    SelectCandidate,
    Write(Attempt),
    Settle(Attempt),
    Verify(Attempt),
    Success(String),
    Exhausted,
}

pub(crate) struct Allocator<'a> {
    ctx: &'a EngineContext,
    cancel: &'a CancellationToken,
    instance_id: &'a str,
    prefix: &'a str,
    window: SettleWindow,
    budget: u32,
    remaining: u32,
    seq: u64,
    /// Fleet-wide names from the newest snapshot; `None` forces a fresh listing.
    known: Option<Vec<String>>,
    last_candidate: Option<String>,
}

impl<'a> Allocator<'a> {
    pub(crate) fn new(
        ctx: &'a EngineContext,
        cancel: &'a CancellationToken,
        instance_id: &'a str,
        prefix: &'a str,
        budget: u32,
        window: SettleWindow,
    ) -> Self {
        Self {
            ctx,
            cancel,
            instance_id,
            prefix,
            window,
            budget,
            remaining: budget,
            seq: 0,
            known: None,
            last_candidate: None,
        }
    }

    pub(crate) async fn run(mut self) -> Result<String, CoreError> {
        info!(
            instance = self.instance_id,
            prefix = self.prefix,
            retries = self.budget,
            "allocating name"
        );

        let mut state = if self.remaining == 0 {
            AllocationState::Exhausted
        } else {
            AllocationState::SelectCandidate
        };

        loop {
            trace!(instance = self.instance_id, ?state, "allocation step");
            state = match state {
                AllocationState::SelectCandidate => self.select_candidate().await?,
                AllocationState::Write(attempt) => self.write(attempt).await,
                AllocationState::Settle(attempt) => self.settle(attempt).await?,
                AllocationState::Verify(attempt) => self.verify(attempt).await,
                AllocationState::Success(name) => {
                    info!(instance = self.instance_id, name = %name, "name successfully set");
                    return Ok(name);
                }
                AllocationState::Exhausted => {
                    error!(
                        instance = self.instance_id,
                        prefix = self.prefix,
                        retries = self.budget,
                        last_candidate = ?self.last_candidate,
                        "max retries reached"
                    );
                    return Err(CoreError::RetriesExhausted {
                        instance_id: self.instance_id.to_string(),
                        prefix: self.prefix.to_string(),
                        retries: self.budget,
                        last_candidate: self.last_candidate.take(),
                    });
                }
            };
        }
    }

    async fn select_candidate(&mut self) -> Result<AllocationState, CoreError> {
        self.check_cancelled()?;

        let known = match self.known.take() {
            Some(names) => names,
            None => match self.snapshot().await {
                Ok(names) => {
                    info!(instance = self.instance_id, existing = ?names, "existing names");
                    names
                }
                Err(source) => {
                    return Ok(self.fail(AttemptError::Io {
                        candidate: None,
                        source,
                    }));
                }
            },
        };

        let candidate = loop {
            self.seq += 1;
            let candidate = format!("{}{}", self.prefix, self.seq);
            if !known.contains(&candidate) {
                break candidate;
            }
            trace!(instance = self.instance_id, candidate = %candidate, "name taken, skipping");
        };
        self.known = Some(known);
        self.last_candidate = Some(candidate.clone());

        let attempt = Attempt {
            candidate,
            seq: self.seq,
            number: self.budget - self.remaining + 1,
            remaining: self.remaining,
        };
        info!(
            instance = self.instance_id,
            candidate = %attempt.candidate,
            seq = attempt.seq,
            attempt = attempt.number,
            remaining = attempt.remaining,
            "trying name"
        );
        Ok(AllocationState::Write(attempt))
    }

    async fn write(&mut self, attempt: Attempt) -> AllocationState {
        let res = self
            .ctx
            .directory()
            .set_tag(self.instance_id, NAME_TAG, &attempt.candidate)
            .await;

        match res {
            Ok(()) => {
                debug!(instance = self.instance_id, candidate = %attempt.candidate, "name tag written");
                AllocationState::Settle(attempt)
            }
            Err(source) => self.fail(AttemptError::Io {
                candidate: Some(attempt.candidate),
                source,
            }),
        }
    }

    async fn settle(&mut self, attempt: Attempt) -> Result<AllocationState, CoreError> {
        let delay = self.ctx.settle().pick(&self.window);
        debug!(
            instance = self.instance_id,
            candidate = %attempt.candidate,
            delay_ms = delay.as_millis() as u64,
            "settling before verification"
        );

        tokio::select! {
            _ = self.cancel.cancelled() => Err(self.cancelled()),
            _ = tokio::time::sleep(delay) => Ok(AllocationState::Verify(attempt)),
        }
    }

    async fn verify(&mut self, attempt: Attempt) -> AllocationState {
        let names = match self.snapshot().await {
            Ok(names) => names,
            Err(source) => {
                self.known = None;
                return self.fail(AttemptError::Io {
                    candidate: Some(attempt.candidate),
                    source,
                });
            }
        };

        let count = count_name(&names, &attempt.candidate);
        self.known = Some(names);

        match count {
            1 => {
                self.ctx.metrics().record_attempt(AttemptOutcome::Won);
                AllocationState::Success(attempt.candidate)
            }
            0 => self.fail(AttemptError::VerificationMiss {
                candidate: attempt.candidate,
            }),
            count => self.fail(AttemptError::Collision {
                candidate: attempt.candidate,
                count,
            }),
        }
    }

    /// Judge a failed round: report it, spend one unit of budget and pick the next state.
    fn fail(&mut self, err: AttemptError) -> AllocationState {
        match &err {
            AttemptError::Collision { .. } => {
                warn!(instance = self.instance_id, remaining = self.remaining, "{err}")
            }
            AttemptError::VerificationMiss { .. } => {
                error!(instance = self.instance_id, remaining = self.remaining, "{err}")
            }
            AttemptError::Io { .. } => {
                warn!(instance = self.instance_id, remaining = self.remaining, "{err}")
            }
        }
        self.ctx.metrics().record_attempt(err.outcome());

        if let Some(candidate) = err.candidate() {
            self.last_candidate = Some(candidate.to_string());
        }
        self.remaining = self.remaining.saturating_sub(1);

        if self.remaining == 0 {
            AllocationState::Exhausted
        } else {
            AllocationState::SelectCandidate
        }
    }

    async fn snapshot(&self) -> Result<Vec<String>, DirectoryError> {
        let instances = self.ctx.directory().list_instances(&Filter::all()).await?;
        debug!(instances = instances.len(), "directory snapshot");
        Ok(instance_names(&instances))
    }

    fn check_cancelled(&self) -> Result<(), CoreError> {
        if self.cancel.is_cancelled() {
            return Err(self.cancelled());
        }
        Ok(())
    }

    fn cancelled(&self) -> CoreError {
        warn!(
            instance = self.instance_id,
            last_candidate = ?self.last_candidate,
            "allocation cancelled"
        );
        CoreError::Cancelled {
            instance_id: self.instance_id.to_string(),
        }
    }
}
