use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("naming scheme not found, provide one of: name, name prefix, group prefix")]
    NoPolicySelected,

    #[error("naming schemes are mutually exclusive, got: {0}")]
    ConflictingPolicies(String),

    #[error("invalid settle window: {0}")]
    InvalidSettleWindow(String),

    #[error("instance id must not be empty")]
    EmptyInstanceId,

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
