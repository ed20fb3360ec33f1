use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, trace, warn};

use fleetname_core::{Directory, DirectoryError};
use fleetname_model::{Filter, Instance};

use crate::error::StoreError;

const DOC_EXT: &str = "json";

/// Directory whose instances are `<root>/<instance-id>.json` documents.
///
/// Listing reads every document into a materialized snapshot. `set_tag` rewrites only
/// the target document through a temp file and a rename, so readers never see a torn
/// document. There is no locking: concurrent writers to the same instance are
/// last-writer-wins, like any other directory backend.
#[derive(Debug, Clone)]
pub struct FileDirectory {
    root: PathBuf,
}

impl FileDirectory {
    /// Open (and create if missing) a directory rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        debug!(root = %root.display(), "file directory opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create or replace the document of an instance.
    pub async fn register(&self, instance: &Instance) -> Result<(), StoreError> {
        let path = self.path_for(&instance.id)?;
        self.write_doc(&path, instance).await
    }

    /// Read a single instance document, `None` if it does not exist.
    pub async fn get(&self, instance_id: &str) -> Result<Option<Instance>, StoreError> {
        let path = self.path_for(instance_id)?;
        match fs::read(&path).await {
            Ok(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn path_for(&self, instance_id: &str) -> Result<PathBuf, StoreError> {
        let valid = !instance_id.is_empty()
            && instance_id != "."
            && instance_id != ".."
            && !instance_id.starts_with('.')
            && !instance_id.contains(['/', '\\', '\0']);
        if !valid {
            return Err(StoreError::InvalidInstanceId(instance_id.to_string()));
        }
        Ok(self.root.join(format!("{instance_id}.{DOC_EXT}")))
    }

    async fn write_doc(&self, path: &Path, instance: &Instance) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(instance)?;
        let tmp = path.with_extension(format!("{DOC_EXT}.tmp.{}", std::process::id()));

        fs::write(&tmp, &body).await?;
        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        trace!(path = %path.display(), "instance document written");
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Instance>, StoreError> {
        let mut out = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DOC_EXT) {
                continue;
            }
            let raw = match fs::read(&path).await {
                Ok(raw) => raw,
                // removed between read_dir and read
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            match serde_json::from_slice::<Instance>(&raw) {
                Ok(instance) => out.push(instance),
                Err(e) => warn!(path = %path.display(), "skipping malformed instance document: {e}"),
            }
        }

        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }
}

#[async_trait]
impl Directory for FileDirectory {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn list_instances(&self, filter: &Filter) -> Result<Vec<Instance>, DirectoryError> {
        let all = self.load_all().await?;
        let total = all.len();
        let out: Vec<Instance> = all.into_iter().filter(|i| filter.matches(i)).collect();

        debug!(root = %self.root.display(), matched = out.len(), total, "listed instances");
        Ok(out)
    }

    async fn set_tag(
        &self,
        instance_id: &str,
        key: &str,
        value: &str,
    ) -> Result<(), DirectoryError> {
        let mut instance = self
            .get(instance_id)
            .await?
            .ok_or_else(|| StoreError::UnknownInstance(instance_id.to_string()))?;

        instance.tags.insert(key, value);
        let path = self.path_for(instance_id)?;
        self.write_doc(&path, &instance).await?;

        debug!(instance = instance_id, key, value, "tag written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetname_model::{GROUP_TAG, NAME_TAG};

    async fn open_temp() -> (tempfile::TempDir, FileDirectory) {
        let tmp = tempfile::tempdir().unwrap();
        let dir = FileDirectory::open(tmp.path().join("fleet")).await.unwrap();
        (tmp, dir)
    }

    #[tokio::test]
    async fn register_then_list() {
        let (_tmp, dir) = open_temp().await;
        dir.register(&Instance::new("i-2").with_tag(GROUP_TAG, "web-"))
            .await
            .unwrap();
        dir.register(&Instance::new("i-1")).await.unwrap();

        let all = dir.list_instances(&Filter::all()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i-1", "i-2"]);

        let one = dir.list_instances(&Filter::instance_id("i-2")).await.unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].tags.group(), Some("web-"));
    }

    #[tokio::test]
    async fn set_tag_rewrites_only_target() {
        let (_tmp, dir) = open_temp().await;
        dir.register(&Instance::new("i-1")).await.unwrap();
        dir.register(&Instance::new("i-2").with_tag(NAME_TAG, "keep"))
            .await
            .unwrap();

        dir.set_tag("i-1", NAME_TAG, "worker-1").await.unwrap();

        let i1 = dir.get("i-1").await.unwrap().unwrap();
        let i2 = dir.get("i-2").await.unwrap().unwrap();
        assert_eq!(i1.tags.name(), Some("worker-1"));
        assert_eq!(i2.tags.name(), Some("keep"));
    }

    #[tokio::test]
    async fn set_tag_on_unknown_instance_fails() {
        let (_tmp, dir) = open_temp().await;
        let err = dir.set_tag("i-404", NAME_TAG, "x").await.unwrap_err();
        assert!(matches!(err, DirectoryError::UnknownInstance(id) if id == "i-404"));
    }

    #[tokio::test]
    async fn malformed_and_foreign_files_are_skipped() {
        let (_tmp, dir) = open_temp().await;
        dir.register(&Instance::new("i-1")).await.unwrap();
        fs::write(dir.root().join("broken.json"), b"{not json").await.unwrap();
        fs::write(dir.root().join("notes.txt"), b"hello").await.unwrap();

        let all = dir.list_instances(&Filter::all()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "i-1");
    }

    #[tokio::test]
    async fn path_traversal_ids_are_rejected() {
        let (_tmp, dir) = open_temp().await;
        for bad in ["", "..", "../etc/passwd", "a/b", ".hidden"] {
            let err = dir.register(&Instance::new(bad)).await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidInstanceId(_)), "{bad:?}");
        }
    }

    #[tokio::test]
    async fn no_temp_files_left_behind() {
        let (_tmp, dir) = open_temp().await;
        dir.register(&Instance::new("i-1")).await.unwrap();
        dir.set_tag("i-1", NAME_TAG, "a").await.unwrap();

        let mut entries = fs::read_dir(dir.root()).await.unwrap();
        let mut names = Vec::new();
        while let Some(e) = entries.next_entry().await.unwrap() {
            names.push(e.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["i-1.json"]);
    }
}
