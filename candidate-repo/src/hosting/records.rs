//! Typed records read from and written to the hosting provider.

use serde::Serialize;

/// An issue read from the template repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRecord {
    /// Issue number in the template repository.
    pub number: u64,

    /// Issue title.
    pub title: String,

    /// Issue body. Empty when the source issue has no body.
    pub body: String,

    /// Label names, in the order the provider returned them.
    pub labels: Vec<String>,

    /// Assignee usernames.
    pub assignees: Vec<String>,
}

/// A pull request read from the template repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestRecord {
    /// Pull request number in the template repository.
    pub number: u64,

    /// Pull request title.
    pub title: String,

    /// Pull request body. Empty when the source has no body.
    pub body: String,

    /// Name of the head branch.
    pub head_branch: String,
}

/// Payload for creating an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
}

impl From<&IssueRecord> for NewIssue {
    fn from(issue: &IssueRecord) -> Self {
        Self {
            title: issue.title.clone(),
            body: issue.body.clone(),
            labels: issue.labels.clone(),
            assignees: issue.assignees.clone(),
        }
    }
}

/// Payload for creating a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPullRequest {
    pub title: String,
    pub body: String,
    /// Branch containing the changes.
    pub head: String,
    /// Branch the changes merge into.
    pub base: String,
}

impl NewPullRequest {
    /// Builds the payload for recreating `pull_request` against `base`.
    #[must_use]
    pub fn from_record(pull_request: &PullRequestRecord, base: &str) -> Self {
        Self {
            title: pull_request.title.clone(),
            body: pull_request.body.clone(),
            head: pull_request.head_branch.clone(),
            base: base.to_string(),
        }
    }
}

/// Repository permission granted to a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Read,
    Triage,
    Write,
    Maintain,
    Admin,
}

impl Permission {
    /// Returns the value the REST API expects for this permission.
    #[must_use]
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::Read => "pull",
            Self::Triage => "triage",
            Self::Write => "push",
            Self::Maintain => "maintain",
            Self::Admin => "admin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_permission_maps_to_push() {
        assert_eq!(Permission::Write.as_api_str(), "push");
        assert_eq!(Permission::Read.as_api_str(), "pull");
    }

    #[test]
    fn new_pull_request_targets_given_base() {
        let record = PullRequestRecord {
            number: 4,
            title: "Add cache".to_string(),
            body: "Closes #2".to_string(),
            head_branch: "feature-x".to_string(),
        };

        let payload = NewPullRequest::from_record(&record, "main");

        assert_eq!(payload.head, "feature-x");
        assert_eq!(payload.base, "main");
        assert_eq!(payload.body, "Closes #2");
    }
}
