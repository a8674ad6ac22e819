//! Read-only preview of a replication run.

use crate::hosting::{IssueRecord, PullRequestRecord};
use crate::repository::RepositoryId;
use serde::Serialize;

/// What a run would create, gathered without mutating anything.
#[derive(Debug, Clone, Serialize)]
pub struct ReplicationPlan {
    /// Template repository.
    pub template: RepositoryId,

    /// Repository that would be created.
    pub target: RepositoryId,

    /// Head branches that would be pushed.
    pub branches: Vec<String>,

    /// Issues that would be recreated, in creation order.
    pub issues: Vec<IssueRecord>,

    /// Pull requests that would be recreated, in creation order.
    pub pull_requests: Vec<PullRequestRecord>,

    /// Candidate that would be invited, if invitation is enabled.
    pub invite: Option<String>,
}
