//! Runner error types.

use super::{RunSummary, Stage};
use thiserror::Error;

/// Errors that can occur while running the replication procedure.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Configuration errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// No token was configured for the GitHub client.
    #[error("A GitHub token is required")]
    MissingToken,

    /// Repository replication failed.
    #[error(transparent)]
    Replicate(#[from] crate::replicator::ReplicateError),

    /// Collaborator invitation failed.
    #[error(transparent)]
    Invite(#[from] crate::invite::InviteError),

    /// Issue transcription failed.
    #[error(transparent)]
    Issues(#[from] crate::issues::IssueError),

    /// Pull request transcription failed.
    #[error(transparent)]
    PullRequests(#[from] crate::pull_requests::PrError),

    /// Pull requests were requested before the repository existed.
    #[error("The candidate repository's default branch is unknown")]
    MissingDefaultBranch,
}

/// Terminal failure of a run.
///
/// Nothing is rolled back: `summary` describes what was created before
/// `stage` failed.
#[derive(Debug, Error)]
#[error("Run failed while {}: {source}", .stage.activity())]
pub struct RunFailure {
    /// Stage that was being entered when the failure occurred.
    pub stage: Stage,
    /// Progress made before the failure.
    pub summary: RunSummary,
    /// Underlying error.
    #[source]
    pub source: RunnerError,
}
