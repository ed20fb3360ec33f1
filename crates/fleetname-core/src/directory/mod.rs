//! Directory abstraction: the shared, eventually consistent instance/tag store.
//!
//! The engine only lists instances and overwrites single tags. Backends decide how the
//! store is reached (cloud API, local files, memory); none of them offer locking or
//! compare-and-swap, and the engine does not expect any.
mod error;
pub use error::DirectoryError;

mod memory;
pub use memory::MemoryDirectory;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use async_trait::async_trait;
use fleetname_model::{Filter, Instance};

/// Instance directory consumed by the naming engine.
///
/// Implementations must return a fully materialized snapshot from `list_instances`
/// and apply `set_tag` as an unconditional last-writer-wins overwrite.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Backend name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// List instances matching every predicate of `filter`.
    ///
    /// An empty filter lists the entire visible fleet.
    async fn list_instances(&self, filter: &Filter) -> Result<Vec<Instance>, DirectoryError>;

    /// Overwrite tag `key` on the instance with `value`.
    async fn set_tag(&self, instance_id: &str, key: &str, value: &str)
    -> Result<(), DirectoryError>;
}

/// Shared handle to a directory backend.
pub type DirectoryHandle = Arc<dyn Directory>;

/// Non-empty `Name` tags of the given instances, duplicates preserved.
pub fn instance_names(instances: &[Instance]) -> Vec<String> {
    instances
        .iter()
        .filter_map(|i| i.tags.name())
        .map(str::to_string)
        .collect()
}

/// Number of occurrences of `name` among `names`.
pub fn count_name(names: &[String], name: &str) -> usize {
    names.iter().filter(|n| n.as_str() == name).count()
}
