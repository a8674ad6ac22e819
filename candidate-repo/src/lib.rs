#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod hosting;
pub mod invite;
pub mod issues;
pub mod pull_requests;
pub mod rate_limit;
pub mod replicator;
pub mod repository;
pub mod runner;
pub mod summary;

pub use config::{load_settings, ConfigError, Settings};
pub use hosting::{
    GitAuth, GitHubClient, HostingClient, HostingEndpoints, HostingError, IssueRecord, NewIssue,
    NewPullRequest, Permission, PullRequestRecord,
};
pub use invite::{invite_collaborator, InviteError, CANDIDATE_PERMISSION};
pub use issues::{load_issues, transcribe_issues, IssueError, TranscribedIssue};
pub use pull_requests::{
    load_pull_requests, transcribe_pull_requests, PrError, TranscribedPullRequest,
};
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo};
pub use replicator::{replicate_repository, BranchSet, ReplicateError, ReplicatedRepository};
pub use repository::{RepositoryId, RepositoryIdError};
pub use runner::{ReplicationPlan, RunFailure, Runner, RunnerConfig, RunnerError, Stage};
pub use summary::RunSummary;
