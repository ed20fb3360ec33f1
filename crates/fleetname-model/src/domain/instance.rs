use serde::{Deserialize, Serialize};

use crate::{InstanceId, Tags};

/// A compute instance as seen through the directory.
///
/// The directory owns instances; the engine only reads the snapshot it was handed
/// and writes single tags back through the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Opaque directory identifier.
    pub id: InstanceId,
    /// Tag snapshot taken when the instance was listed.
    #[serde(default)]
    pub tags: Tags,
}

impl Instance {
    /// Create an untagged instance.
    pub fn new(id: impl Into<InstanceId>) -> Self {
        Self {
            id: id.into(),
            tags: Tags::new(),
        }
    }

    /// Builder-style helper attaching a tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key, value);
        self
    }

    /// Value of a tag, if present.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key)
    }
}
