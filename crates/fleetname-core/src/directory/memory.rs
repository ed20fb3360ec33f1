use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;

use fleetname_model::{Filter, Instance, InstanceId, Tags};

use super::{Directory, DirectoryError};

/// In-process directory backed by a map of instance id to tags.
///
/// Shared by every engine holding the same handle, which makes it suitable for
/// simulating a fleet of concurrently starting instances in a single process.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    instances: RwLock<BTreeMap<InstanceId, Tags>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory pre-populated with the given instances.
    pub fn with_instances(instances: impl IntoIterator<Item = Instance>) -> Self {
        let map = instances.into_iter().map(|i| (i.id, i.tags)).collect();
        Self {
            instances: RwLock::new(map),
        }
    }

    /// Add or replace an instance.
    pub async fn insert(&self, instance: Instance) {
        self.instances
            .write()
            .await
            .insert(instance.id, instance.tags);
    }

    /// Current tags of an instance.
    pub async fn tags(&self, instance_id: &str) -> Option<Tags> {
        self.instances.read().await.get(instance_id).cloned()
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_instances(&self, filter: &Filter) -> Result<Vec<Instance>, DirectoryError> {
        let guard = self.instances.read().await;
        let out: Vec<Instance> = guard
            .iter()
            .map(|(id, tags)| Instance {
                id: id.clone(),
                tags: tags.clone(),
            })
            .filter(|i| filter.matches(i))
            .collect();

        trace!(matched = out.len(), total = guard.len(), "memory directory listing");
        Ok(out)
    }

    async fn set_tag(
        &self,
        instance_id: &str,
        key: &str,
        value: &str,
    ) -> Result<(), DirectoryError> {
        let mut guard = self.instances.write().await;
        let tags = guard
            .get_mut(instance_id)
            .ok_or_else(|| DirectoryError::UnknownInstance(instance_id.to_string()))?;
        tags.insert(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetname_model::{GROUP_TAG, NAME_TAG};

    #[tokio::test]
    async fn list_applies_filter() {
        let dir = MemoryDirectory::with_instances([
            Instance::new("i-1").with_tag(GROUP_TAG, "web"),
            Instance::new("i-2").with_tag(GROUP_TAG, "db"),
        ]);

        let all = dir.list_instances(&Filter::all()).await.unwrap();
        assert_eq!(all.len(), 2);

        let web = dir
            .list_instances(&Filter::all().and_tag(GROUP_TAG, "web"))
            .await
            .unwrap();
        assert_eq!(web.len(), 1);
        assert_eq!(web[0].id, "i-1");
    }

    #[tokio::test]
    async fn set_tag_overwrites_last_writer_wins() {
        let dir = MemoryDirectory::with_instances([Instance::new("i-1")]);

        dir.set_tag("i-1", NAME_TAG, "a").await.unwrap();
        dir.set_tag("i-1", NAME_TAG, "b").await.unwrap();

        assert_eq!(dir.tags("i-1").await.unwrap().name(), Some("b"));
    }

    #[tokio::test]
    async fn insert_adds_and_replaces_instances() {
        let dir = MemoryDirectory::new();
        dir.insert(Instance::new("i-1").with_tag(NAME_TAG, "a")).await;
        dir.insert(Instance::new("i-1").with_tag(GROUP_TAG, "web")).await;

        let tags = dir.tags("i-1").await.unwrap();
        assert!(tags.name().is_none());
        assert_eq!(tags.group(), Some("web"));
        assert_eq!(dir.list_instances(&Filter::all()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn set_tag_on_unknown_instance_fails() {
        let dir = MemoryDirectory::new();
        let err = dir.set_tag("i-404", NAME_TAG, "x").await.unwrap_err();
        assert!(matches!(err, DirectoryError::UnknownInstance(id) if id == "i-404"));
    }
}
