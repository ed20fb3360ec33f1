use thiserror::Error;

use fleetname_model::{InstanceId, ModelError};

use crate::directory::DirectoryError;
use crate::metrics::AllocationOutcome;

/// Fatal outcome of a naming request.
///
/// Per-attempt failures never show up here: they are absorbed by the allocation loop
/// and only surface as [`CoreError::RetriesExhausted`] once the budget is spent.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("instance not found: {instance_id}")]
    InstanceNotFound { instance_id: InstanceId },

    #[error("instance {instance_id} already has name {name:?} and overwrite was not requested")]
    AlreadyNamed { instance_id: InstanceId, name: String },

    #[error("instance {instance_id} has no group attached (tag {tag:?} is missing or empty)")]
    NoGroupAttached {
        instance_id: InstanceId,
        tag: &'static str,
    },

    #[error("naming scheme not found, provide one of: name, name prefix, group prefix")]
    NoPolicySelected,

    #[error(
        "max retries reached for instance {instance_id}: prefix {prefix:?}, {retries} attempt(s) failed, last candidate {last_candidate:?}"
    )]
    RetriesExhausted {
        instance_id: InstanceId,
        prefix: String,
        retries: u32,
        last_candidate: Option<String>,
    },

    #[error("naming of instance {instance_id} cancelled")]
    Cancelled { instance_id: InstanceId },

    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("invalid request: {0}")]
    Model(ModelError),
}

impl From<ModelError> for CoreError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::NoPolicySelected => CoreError::NoPolicySelected,
            other => CoreError::Model(other),
        }
    }
}

impl CoreError {
    /// Metrics classification of this error.
    pub fn outcome(&self) -> AllocationOutcome {
        match self {
            CoreError::InstanceNotFound { .. } => AllocationOutcome::NotFound,
            CoreError::AlreadyNamed { .. } => AllocationOutcome::AlreadyNamed,
            CoreError::NoGroupAttached { .. } => AllocationOutcome::NoGroup,
            CoreError::RetriesExhausted { .. } => AllocationOutcome::Exhausted,
            CoreError::Cancelled { .. } => AllocationOutcome::Cancelled,
            CoreError::NoPolicySelected | CoreError::Model(_) => AllocationOutcome::Invalid,
            CoreError::Directory(_) => AllocationOutcome::Failed,
        }
    }
}
