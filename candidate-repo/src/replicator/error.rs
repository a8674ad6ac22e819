//! Repository replication error types.

use super::ReplicatedRepository;
use crate::hosting::HostingError;
use thiserror::Error;

/// Errors that can occur while replicating the template repository.
#[derive(Debug, Error)]
pub enum ReplicateError {
    /// The temporary working directory could not be created.
    #[error("Failed to create working directory: {source}")]
    WorkingDirectory {
        #[source]
        source: std::io::Error,
    },

    /// An open pull request references a branch name git would reject.
    #[error("Invalid head branch '{branch}': {message}")]
    InvalidBranch { branch: String, message: String },

    /// The hosting provider or git rejected a step.
    #[error(transparent)]
    Hosting(#[from] HostingError),

    /// A head branch push failed after the repository was created.
    #[error("Failed to push branch '{branch}' to {}: {source}", .replicated.repository)]
    PushBranch {
        branch: String,
        /// What exists in the candidate repository so far.
        replicated: Box<ReplicatedRepository>,
        #[source]
        source: HostingError,
    },
}

impl ReplicateError {
    /// Returns the partially replicated repository when the failure
    /// happened after creation.
    #[must_use]
    pub fn partial(&self) -> Option<&ReplicatedRepository> {
        match self {
            Self::PushBranch { replicated, .. } => Some(replicated.as_ref()),
            _ => None,
        }
    }
}
