//! Transcribed pull request information.

use serde::Serialize;

/// A pull request recreated in the candidate repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscribedPullRequest {
    /// Pull request number in the template repository.
    pub source_number: u64,

    /// Pull request number assigned by the candidate repository.
    pub number: u64,

    /// Head branch.
    pub head: String,

    /// Base branch.
    pub base: String,
}
