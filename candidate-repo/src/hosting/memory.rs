//! In-memory [`HostingClient`] that records every call.
//!
//! Models the provider behaviour the replication procedure depends on:
//! repository name collisions, a shared issue/pull request number sequence,
//! default labels, assignee access checks and head branches that must exist
//! before a pull request can be opened.

use super::{
    HostingClient, HostingError, IssueRecord, NewIssue, NewPullRequest, Permission,
    PullRequestRecord,
};
use crate::repository::RepositoryId;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Labels every new repository starts with.
pub const DEFAULT_LABELS: &[&str] = &[
    "bug",
    "documentation",
    "duplicate",
    "enhancement",
    "good first issue",
    "help wanted",
    "invalid",
    "question",
    "wontfix",
];

/// A call made against [`InMemoryHosting`], in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostingCall {
    CloneFullHistory {
        repository: RepositoryId,
        destination: PathBuf,
    },
    CreateRepository {
        repository: RepositoryId,
    },
    PushBranch {
        repository: RepositoryId,
        local_ref: String,
        branch: String,
    },
    ListOpenPullRequestHeadBranches {
        repository: RepositoryId,
    },
    ListIssues {
        repository: RepositoryId,
    },
    ListPullRequests {
        repository: RepositoryId,
    },
    CreateIssue {
        repository: RepositoryId,
        issue: NewIssue,
    },
    CreatePullRequest {
        repository: RepositoryId,
        pull_request: NewPullRequest,
    },
    AddCollaborator {
        repository: RepositoryId,
        username: String,
        permission: Permission,
    },
}

impl HostingCall {
    /// Returns `true` for calls that change provider state.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateRepository { .. }
                | Self::PushBranch { .. }
                | Self::CreateIssue { .. }
                | Self::CreatePullRequest { .. }
                | Self::AddCollaborator { .. }
        )
    }
}

/// A pull request stored in a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedPullRequest {
    pub record: PullRequestRecord,
    pub base: String,
    pub open: bool,
}

/// State of a repository held by [`InMemoryHosting`].
#[derive(Debug, Clone, Default)]
pub struct HostedRepository {
    pub default_branch: String,
    pub branches: BTreeSet<String>,
    pub issues: Vec<IssueRecord>,
    pub pull_requests: Vec<HostedPullRequest>,
    pub collaborators: BTreeMap<String, Permission>,
    pub private: bool,
    next_number: u64,
}

impl HostedRepository {
    /// Creates a repository whose only branch is `default_branch`.
    pub fn new(default_branch: impl Into<String>) -> Self {
        let default_branch = default_branch.into();
        Self {
            branches: BTreeSet::from([default_branch.clone()]),
            default_branch,
            next_number: 1,
            ..Default::default()
        }
    }

    /// Adds a branch.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branches.insert(branch.into());
        self
    }

    /// Adds an issue with its existing number.
    #[must_use]
    pub fn with_issue(mut self, issue: IssueRecord) -> Self {
        self.next_number = self.next_number.max(issue.number + 1);
        self.issues.push(issue);
        self
    }

    /// Adds an open pull request targeting the default branch.
    #[must_use]
    pub fn with_pull_request(self, pull_request: PullRequestRecord) -> Self {
        self.with_pull_request_state(pull_request, true)
    }

    /// Adds a closed pull request.
    #[must_use]
    pub fn with_closed_pull_request(self, pull_request: PullRequestRecord) -> Self {
        self.with_pull_request_state(pull_request, false)
    }

    fn with_pull_request_state(mut self, record: PullRequestRecord, open: bool) -> Self {
        self.next_number = self.next_number.max(record.number + 1);
        self.pull_requests.push(HostedPullRequest {
            record,
            base: self.default_branch.clone(),
            open,
        });
        self
    }

    fn allocate_number(&mut self) -> u64 {
        let number = self.next_number;
        self.next_number += 1;
        number
    }
}

#[derive(Debug, Default)]
struct State {
    repositories: HashMap<RepositoryId, HostedRepository>,
    users: HashSet<String>,
    clones: HashMap<PathBuf, RepositoryId>,
    calls: Vec<HostingCall>,
}

/// Cloneable handle to shared in-memory provider state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHosting {
    state: Arc<Mutex<State>>,
}

impl InMemoryHosting {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user account.
    pub fn add_user(&self, username: impl Into<String>) {
        self.lock().users.insert(username.into());
    }

    /// Stores a repository, replacing any existing one with the same id.
    pub fn add_repository(&self, id: RepositoryId, repository: HostedRepository) {
        self.lock().repositories.insert(id, repository);
    }

    /// Returns a snapshot of a repository.
    #[must_use]
    pub fn repository(&self, id: &RepositoryId) -> Option<HostedRepository> {
        self.lock().repositories.get(id).cloned()
    }

    /// Returns every call made so far.
    #[must_use]
    pub fn calls(&self) -> Vec<HostingCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means another test thread panicked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn not_found(operation: &'static str) -> HostingError {
    HostingError::Api {
        operation,
        message: "404 Not Found".to_string(),
    }
}

fn validation_failed(operation: &'static str, detail: &str) -> HostingError {
    HostingError::Api {
        operation,
        message: format!("422 Unprocessable Entity Validation Failed ({detail})"),
    }
}

#[async_trait]
impl HostingClient for InMemoryHosting {
    async fn clone_full_history(
        &self,
        repository: &RepositoryId,
        destination: &Path,
    ) -> Result<(), HostingError> {
        let mut state = self.lock();
        state.calls.push(HostingCall::CloneFullHistory {
            repository: repository.clone(),
            destination: destination.to_path_buf(),
        });

        if !state.repositories.contains_key(repository) {
            return Err(HostingError::Git {
                command: "clone".to_string(),
                message: format!("remote: Repository not found. ({repository})"),
            });
        }

        std::fs::write(destination.join("HEAD"), "ref: refs/heads/main\n").map_err(|source| {
            HostingError::GitSpawn {
                command: "clone".to_string(),
                source,
            }
        })?;
        state
            .clones
            .insert(destination.to_path_buf(), repository.clone());
        Ok(())
    }

    async fn create_repository(
        &self,
        target: &RepositoryId,
        source: &Path,
    ) -> Result<String, HostingError> {
        let mut state = self.lock();
        state.calls.push(HostingCall::CreateRepository {
            repository: target.clone(),
        });

        if state.repositories.contains_key(target) {
            return Err(validation_failed(
                "create repository",
                "name already exists on this account",
            ));
        }

        let default_branch = state
            .clones
            .get(source)
            .and_then(|template| state.repositories.get(template))
            .map(|template| template.default_branch.clone())
            .ok_or_else(|| HostingError::Git {
                command: "push".to_string(),
                message: "fatal: not a git repository".to_string(),
            })?;

        let mut repository = HostedRepository::new(default_branch.clone());
        repository.private = true;
        state.repositories.insert(target.clone(), repository);
        Ok(default_branch)
    }

    async fn push_branch(
        &self,
        source: &Path,
        local_ref: &str,
        target: &RepositoryId,
        branch: &str,
    ) -> Result<(), HostingError> {
        let mut state = self.lock();
        state.calls.push(HostingCall::PushBranch {
            repository: target.clone(),
            local_ref: local_ref.to_string(),
            branch: branch.to_string(),
        });

        let source_has_ref = state
            .clones
            .get(source)
            .and_then(|template| state.repositories.get(template))
            .is_some_and(|template| {
                local_ref
                    .strip_prefix("refs/remotes/origin/")
                    .is_some_and(|name| template.branches.contains(name))
            });
        if !source_has_ref {
            return Err(HostingError::Git {
                command: "push".to_string(),
                message: format!("error: src refspec {local_ref} does not match any"),
            });
        }

        let repository = state
            .repositories
            .get_mut(target)
            .ok_or_else(|| HostingError::Git {
                command: "push".to_string(),
                message: "remote: Repository not found.".to_string(),
            })?;
        repository.branches.insert(branch.to_string());
        Ok(())
    }

    async fn list_open_pull_request_head_branches(
        &self,
        repository: &RepositoryId,
    ) -> Result<Vec<String>, HostingError> {
        let mut state = self.lock();
        state.calls.push(HostingCall::ListOpenPullRequestHeadBranches {
            repository: repository.clone(),
        });

        let hosted = state
            .repositories
            .get(repository)
            .ok_or_else(|| not_found("list pull requests"))?;
        Ok(hosted
            .pull_requests
            .iter()
            .filter(|pr| pr.open)
            .map(|pr| pr.record.head_branch.clone())
            .collect())
    }

    async fn list_issues(&self, repository: &RepositoryId) -> Result<Vec<IssueRecord>, HostingError> {
        let mut state = self.lock();
        state.calls.push(HostingCall::ListIssues {
            repository: repository.clone(),
        });

        let hosted = state
            .repositories
            .get(repository)
            .ok_or_else(|| not_found("list issues"))?;
        Ok(hosted.issues.clone())
    }

    async fn list_pull_requests(
        &self,
        repository: &RepositoryId,
    ) -> Result<Vec<PullRequestRecord>, HostingError> {
        let mut state = self.lock();
        state.calls.push(HostingCall::ListPullRequests {
            repository: repository.clone(),
        });

        let hosted = state
            .repositories
            .get(repository)
            .ok_or_else(|| not_found("list pull requests"))?;
        Ok(hosted
            .pull_requests
            .iter()
            .filter(|pr| pr.open)
            .map(|pr| pr.record.clone())
            .collect())
    }

    async fn create_issue(
        &self,
        repository: &RepositoryId,
        issue: &NewIssue,
    ) -> Result<u64, HostingError> {
        let mut state = self.lock();
        state.calls.push(HostingCall::CreateIssue {
            repository: repository.clone(),
            issue: issue.clone(),
        });

        let hosted = state
            .repositories
            .get(repository)
            .ok_or_else(|| not_found("create issue"))?;

        if let Some(label) = issue
            .labels
            .iter()
            .find(|label| !DEFAULT_LABELS.contains(&label.as_str()))
        {
            return Err(validation_failed(
                "create issue",
                &format!("label '{label}' does not exist"),
            ));
        }

        if let Some(assignee) = issue.assignees.iter().find(|assignee| {
            **assignee != repository.owner && !hosted.collaborators.contains_key(*assignee)
        }) {
            return Err(validation_failed(
                "create issue",
                &format!("cannot assign '{assignee}'"),
            ));
        }

        let hosted = state
            .repositories
            .get_mut(repository)
            .ok_or_else(|| not_found("create issue"))?;
        let number = hosted.allocate_number();
        hosted.issues.push(IssueRecord {
            number,
            title: issue.title.clone(),
            body: issue.body.clone(),
            labels: issue.labels.clone(),
            assignees: issue.assignees.clone(),
        });
        Ok(number)
    }

    async fn create_pull_request(
        &self,
        repository: &RepositoryId,
        pull_request: &NewPullRequest,
    ) -> Result<u64, HostingError> {
        let mut state = self.lock();
        state.calls.push(HostingCall::CreatePullRequest {
            repository: repository.clone(),
            pull_request: pull_request.clone(),
        });

        let hosted = state
            .repositories
            .get_mut(repository)
            .ok_or_else(|| not_found("create pull request"))?;

        if !hosted.branches.contains(&pull_request.head) {
            return Err(validation_failed("create pull request", "head invalid"));
        }
        if !hosted.branches.contains(&pull_request.base) {
            return Err(validation_failed("create pull request", "base invalid"));
        }

        let number = hosted.allocate_number();
        hosted.pull_requests.push(HostedPullRequest {
            record: PullRequestRecord {
                number,
                title: pull_request.title.clone(),
                body: pull_request.body.clone(),
                head_branch: pull_request.head.clone(),
            },
            base: pull_request.base.clone(),
            open: true,
        });
        Ok(number)
    }

    async fn add_collaborator(
        &self,
        repository: &RepositoryId,
        username: &str,
        permission: Permission,
    ) -> Result<(), HostingError> {
        let mut state = self.lock();
        state.calls.push(HostingCall::AddCollaborator {
            repository: repository.clone(),
            username: username.to_string(),
            permission,
        });

        if !state.users.contains(username) {
            return Err(not_found("add collaborator"));
        }

        let hosted = state
            .repositories
            .get_mut(repository)
            .ok_or_else(|| not_found("add collaborator"))?;
        hosted
            .collaborators
            .insert(username.to_string(), permission);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(number: u64, title: &str) -> IssueRecord {
        IssueRecord {
            number,
            title: title.to_string(),
            body: String::new(),
            labels: Vec::new(),
            assignees: Vec::new(),
        }
    }

    #[tokio::test]
    async fn issues_and_pull_requests_share_numbers() {
        let hosting = InMemoryHosting::new();
        let repo = RepositoryId::new("acme", "exercise-bob");
        hosting.add_repository(repo.clone(), HostedRepository::new("main").with_branch("x"));

        let first = hosting
            .create_issue(&repo, &NewIssue::from(&issue(9, "one")))
            .await
            .unwrap();
        let second = hosting
            .create_pull_request(
                &repo,
                &NewPullRequest {
                    title: "two".to_string(),
                    body: String::new(),
                    head: "x".to_string(),
                    base: "main".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!((first, second), (1, 2));
    }

    #[tokio::test]
    async fn rejects_unknown_labels() {
        let hosting = InMemoryHosting::new();
        let repo = RepositoryId::new("acme", "exercise-bob");
        hosting.add_repository(repo.clone(), HostedRepository::new("main"));

        let mut record = issue(1, "one");
        record.labels.push("priority: high".to_string());

        let result = hosting.create_issue(&repo, &NewIssue::from(&record)).await;
        assert!(matches!(result, Err(HostingError::Api { .. })));
    }

    #[tokio::test]
    async fn records_calls_in_order() {
        let hosting = InMemoryHosting::new();
        let repo = RepositoryId::new("acme", "exercise");
        hosting.add_repository(repo.clone(), HostedRepository::new("main"));

        hosting.list_issues(&repo).await.unwrap();
        hosting.list_pull_requests(&repo).await.unwrap();

        let calls = hosting.calls();
        assert!(matches!(calls[0], HostingCall::ListIssues { .. }));
        assert!(matches!(calls[1], HostingCall::ListPullRequests { .. }));
        assert!(calls.iter().all(|call| !call.is_mutation()));
    }
}
