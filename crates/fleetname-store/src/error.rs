use thiserror::Error;

use fleetname_core::DirectoryError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed instance document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid instance id for file store: {0:?}")]
    InvalidInstanceId(String),

    #[error("unknown instance: {0}")]
    UnknownInstance(String),
}

impl From<StoreError> for DirectoryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Io(e) => DirectoryError::Io(e.to_string()),
            StoreError::UnknownInstance(id) => DirectoryError::UnknownInstance(id),
            other => DirectoryError::Backend(other.to_string()),
        }
    }
}
