//! Hosting provider capabilities used by the replication procedure.
//!
//! [`HostingClient`] is the only seam between the procedure and the remote
//! provider. [`GitHubClient`] talks to GitHub; `InMemoryHosting` (behind the
//! `test-support` feature) records calls for tests.

mod endpoints;
mod error;
mod git;
mod github;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
mod records;

pub use endpoints::{HostingEndpoints, DEFAULT_API_BASE, DEFAULT_GIT_BASE};
pub use error::HostingError;
pub use git::GitAuth;
pub use github::GitHubClient;
pub use records::{IssueRecord, NewIssue, NewPullRequest, Permission, PullRequestRecord};

use crate::repository::RepositoryId;
use async_trait::async_trait;
use std::path::Path;

/// Repository, issue and pull request operations against a hosting provider.
///
/// Every method is a single blocking request/response from the caller's
/// point of view; implementations must not reorder or batch calls.
#[async_trait]
pub trait HostingClient: Send + Sync {
    /// Clones the full history of `repository` into the empty directory
    /// `destination`, keeping every remote branch as a remote-tracking ref.
    async fn clone_full_history(
        &self,
        repository: &RepositoryId,
        destination: &Path,
    ) -> Result<(), HostingError>;

    /// Creates `target` as a private repository and pushes the checked-out
    /// branch of the clone at `source` to it.
    ///
    /// Returns the name of the pushed default branch.
    async fn create_repository(
        &self,
        target: &RepositoryId,
        source: &Path,
    ) -> Result<String, HostingError>;

    /// Pushes `local_ref` from the clone at `source` to `branch` on `target`.
    async fn push_branch(
        &self,
        source: &Path,
        local_ref: &str,
        target: &RepositoryId,
        branch: &str,
    ) -> Result<(), HostingError>;

    /// Lists head branch names of the open pull requests in `repository`.
    async fn list_open_pull_request_head_branches(
        &self,
        repository: &RepositoryId,
    ) -> Result<Vec<String>, HostingError>;

    /// Lists every issue in `repository`, open or closed. Pull requests are
    /// not included.
    async fn list_issues(&self, repository: &RepositoryId) -> Result<Vec<IssueRecord>, HostingError>;

    /// Lists the open pull requests in `repository`.
    async fn list_pull_requests(
        &self,
        repository: &RepositoryId,
    ) -> Result<Vec<PullRequestRecord>, HostingError>;

    /// Creates an issue, returning its number.
    async fn create_issue(
        &self,
        repository: &RepositoryId,
        issue: &NewIssue,
    ) -> Result<u64, HostingError>;

    /// Creates a pull request, returning its number.
    async fn create_pull_request(
        &self,
        repository: &RepositoryId,
        pull_request: &NewPullRequest,
    ) -> Result<u64, HostingError>;

    /// Grants `username` the given permission on `repository`.
    async fn add_collaborator(
        &self,
        repository: &RepositoryId,
        username: &str,
        permission: Permission,
    ) -> Result<(), HostingError>;
}
