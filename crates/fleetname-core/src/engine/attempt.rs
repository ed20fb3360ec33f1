use thiserror::Error;

use crate::directory::DirectoryError;
use crate::metrics::AttemptOutcome;

/// One write-settle-verify round of the allocation loop.
///
/// Created when a candidate is selected and dropped once the round is judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Attempt {
    /// Proposed name, `prefix + seq`.
    pub(crate) candidate: String,
    /// Numeric suffix; strictly increasing across the rounds of one request.
    pub(crate) seq: u64,
    /// 1-based index of this round within the retry budget.
    pub(crate) number: u32,
    /// Budget left before this round is judged.
    pub(crate) remaining: u32,
}

/// Failure of a single round. Consumes one unit of retry budget, never fatal on its own.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("name collision {candidate:?}: observed on {count} instances")]
    Collision { candidate: String, count: usize },

    #[error("name not found after set {candidate:?}")]
    VerificationMiss { candidate: String },

    #[error("directory error (candidate {candidate:?}): {source}")]
    Io {
        candidate: Option<String>,
        #[source]
        source: DirectoryError,
    },
}

impl AttemptError {
    pub fn outcome(&self) -> AttemptOutcome {
        match self {
            AttemptError::Collision { .. } => AttemptOutcome::Collision,
            AttemptError::VerificationMiss { .. } => AttemptOutcome::Miss,
            AttemptError::Io { .. } => AttemptOutcome::Io,
        }
    }

    /// Candidate the round was working on, if it got as far as selecting one.
    pub fn candidate(&self) -> Option<&str> {
        match self {
            AttemptError::Collision { candidate, .. }
            | AttemptError::VerificationMiss { candidate } => Some(candidate.as_str()),
            AttemptError::Io { candidate, .. } => candidate.as_deref(),
        }
    }
}
