//! Run summary types.

use crate::issues::TranscribedIssue;
use crate::pull_requests::TranscribedPullRequest;
use crate::replicator::ReplicatedRepository;
use crate::repository::RepositoryId;
use crate::runner::Stage;
use serde::Serialize;

/// Summary of a replication run, complete or partial.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Template repository.
    pub template: RepositoryId,

    /// Candidate repository.
    pub repository: RepositoryId,

    /// Last stage reached.
    pub stage: Stage,

    /// Default branch of the candidate repository, once created.
    pub default_branch: Option<String>,

    /// Head branches pushed after creation.
    pub branches_pushed: Vec<String>,

    /// Whether the candidate was invited.
    pub invited: bool,

    /// Issues created, in creation order.
    pub issues: Vec<TranscribedIssue>,

    /// Pull requests created, in creation order.
    pub pull_requests: Vec<TranscribedPullRequest>,
}

impl RunSummary {
    /// Creates an empty summary at [`Stage::Start`].
    #[must_use]
    pub fn new(template: RepositoryId, repository: RepositoryId) -> Self {
        Self {
            template,
            repository,
            stage: Stage::Start,
            default_branch: None,
            branches_pushed: Vec::new(),
            invited: false,
            issues: Vec::new(),
            pull_requests: Vec::new(),
        }
    }

    /// Records the outcome of replication.
    pub fn record_replication(&mut self, replicated: ReplicatedRepository) {
        self.default_branch = Some(replicated.default_branch);
        self.branches_pushed = replicated.branches;
    }

    /// Records that the candidate was invited.
    pub fn record_invite(&mut self) {
        self.invited = true;
    }

    /// Records transcribed issues.
    pub fn record_issues(&mut self, issues: Vec<TranscribedIssue>) {
        self.issues = issues;
    }

    /// Records transcribed pull requests.
    pub fn record_pull_requests(&mut self, pull_requests: Vec<TranscribedPullRequest>) {
        self.pull_requests = pull_requests;
    }

    /// Returns true once the run reached [`Stage::Done`].
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stage == Stage::Done
    }

    /// Returns true if the candidate repository was created.
    #[must_use]
    pub fn repository_created(&self) -> bool {
        self.default_branch.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_record_replication() {
        let repository = RepositoryId::new("acme", "exercise-bob");
        let mut summary =
            RunSummary::new(RepositoryId::new("templates", "exercise"), repository.clone());
        assert!(!summary.repository_created());

        summary.record_replication(ReplicatedRepository {
            repository,
            default_branch: "main".to_string(),
            branches: vec!["feature-x".to_string()],
        });

        assert!(summary.repository_created());
        assert_eq!(summary.default_branch.as_deref(), Some("main"));
        assert_eq!(summary.branches_pushed, vec!["feature-x"]);
        assert!(!summary.is_complete());
    }
}
