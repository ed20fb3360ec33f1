use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("io error: {0}")]
    Io(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("unknown instance: {0}")]
    UnknownInstance(String),
}

impl From<std::io::Error> for DirectoryError {
    fn from(e: std::io::Error) -> Self {
        DirectoryError::Io(e.to_string())
    }
}
