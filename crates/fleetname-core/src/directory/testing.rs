//! Scriptable directory used by engine tests.
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use tokio::sync::Barrier;

use fleetname_model::{Filter, Instance, NAME_TAG};

use super::{Directory, DirectoryError, MemoryDirectory};

/// Holds the first `remaining` directory calls until as many callers reached the barrier.
struct Gate {
    barrier: Barrier,
    remaining: AtomicUsize,
}

/// [`MemoryDirectory`] wrapper that records traffic and injects faults.
pub(crate) struct FakeDirectory {
    inner: MemoryDirectory,
    writes: Mutex<Vec<(String, String, String)>>,
    lists: AtomicUsize,
    fail_lists: Vec<usize>,
    fail_writes: AtomicUsize,
    drop_writes: bool,
    phantom: Option<Mutex<Option<String>>>,
    gate: Option<Gate>,
}

impl FakeDirectory {
    pub(crate) fn new(instances: impl IntoIterator<Item = Instance>) -> Self {
        Self {
            inner: MemoryDirectory::with_instances(instances),
            writes: Mutex::new(Vec::new()),
            lists: AtomicUsize::new(0),
            fail_lists: Vec::new(),
            fail_writes: AtomicUsize::new(0),
            drop_writes: false,
            phantom: None,
            gate: None,
        }
    }

    /// Fail the next `n` writes with an io error.
    pub(crate) fn failing_writes(self, n: usize) -> Self {
        self.fail_writes.store(n, Ordering::SeqCst);
        self
    }

    /// Fail the listings with these 1-based call numbers with an io error.
    pub(crate) fn failing_lists(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.fail_lists = calls.into_iter().collect();
        self
    }

    /// Accept writes without applying them.
    pub(crate) fn dropping_writes(mut self) -> Self {
        self.drop_writes = true;
        self
    }

    /// Every listing shows one more instance carrying the last written name.
    pub(crate) fn with_phantom_duplicate(mut self) -> Self {
        self.phantom = Some(Mutex::new(None));
        self
    }

    /// Run the first `calls` operations in lockstep groups of `parties`.
    ///
    /// The operation is applied first and the caller then waits at the barrier, so every
    /// party observes the state before any party moves on to its next operation.
    pub(crate) fn lockstep(mut self, parties: usize, calls: usize) -> Self {
        self.gate = Some(Gate {
            barrier: Barrier::new(parties),
            remaining: AtomicUsize::new(calls),
        });
        self
    }

    pub(crate) fn writes(&self) -> Vec<(String, String, String)> {
        self.writes.lock().unwrap().clone()
    }

    pub(crate) fn written_names(&self) -> Vec<String> {
        self.writes()
            .into_iter()
            .filter(|(_, k, _)| k == NAME_TAG)
            .map(|(_, _, v)| v)
            .collect()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub(crate) async fn name_of(&self, instance_id: &str) -> Option<String> {
        self.inner
            .tags(instance_id)
            .await
            .and_then(|t| t.name().map(str::to_string))
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            let gated = gate
                .remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_sub(1))
                .is_ok();
            if gated {
                gate.barrier.wait().await;
            }
        }
    }
}

#[async_trait]
impl Directory for FakeDirectory {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn list_instances(&self, filter: &Filter) -> Result<Vec<Instance>, DirectoryError> {
        let call = self.lists.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_lists.contains(&call) {
            return Err(DirectoryError::Io(format!("injected list failure (call {call})")));
        }
        let mut out = self.inner.list_instances(filter).await?;

        if let Some(phantom) = &self.phantom {
            let last = phantom.lock().unwrap().clone();
            if let Some(name) = last {
                let ghost = Instance::new("i-phantom").with_tag(NAME_TAG, name);
                if filter.matches(&ghost) {
                    out.push(ghost);
                }
            }
        }

        self.pass_gate().await;
        Ok(out)
    }

    async fn set_tag(
        &self,
        instance_id: &str,
        key: &str,
        value: &str,
    ) -> Result<(), DirectoryError> {
        self.writes.lock().unwrap().push((
            instance_id.to_string(),
            key.to_string(),
            value.to_string(),
        ));

        let failed = self
            .fail_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_sub(1))
            .is_ok();

        let res = if failed {
            Err(DirectoryError::Io("injected write failure".into()))
        } else if self.drop_writes {
            Ok(())
        } else {
            if let Some(phantom) = &self.phantom {
                *phantom.lock().unwrap() = Some(value.to_string());
            }
            self.inner.set_tag(instance_id, key, value).await
        };

        self.pass_gate().await;
        res
    }
}
