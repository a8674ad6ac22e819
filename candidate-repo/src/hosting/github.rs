//! GitHub implementation of [`HostingClient`].
//!
//! REST calls go through octocrab; history is moved with the `git` CLI.

use super::git::{self, GitAuth};
use super::{
    HostingClient, HostingEndpoints, HostingError, IssueRecord, NewIssue, NewPullRequest,
    Permission, PullRequestRecord,
};
use crate::rate_limit::ensure_core_rate_limit;
use crate::repository::RepositoryId;
use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Results per page for list endpoints.
const PER_PAGE: &str = "100";

/// GitHub-backed hosting client.
pub struct GitHubClient {
    octocrab: Octocrab,
    endpoints: HostingEndpoints,
    auth: GitAuth,
}

impl GitHubClient {
    /// Creates a client from an existing octocrab instance.
    #[must_use]
    pub fn new(octocrab: Octocrab, endpoints: HostingEndpoints, auth: GitAuth) -> Self {
        Self {
            octocrab,
            endpoints,
            auth,
        }
    }

    /// Builds an authenticated client for `endpoints`.
    ///
    /// # Errors
    ///
    /// Returns [`octocrab::Error`] if the API base is rejected or the HTTP
    /// client cannot be constructed.
    pub fn for_token(
        token: &str,
        endpoints: HostingEndpoints,
        auth: GitAuth,
    ) -> Result<Self, octocrab::Error> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(endpoints.api_base())?
            .build()?;
        Ok(Self::new(octocrab, endpoints, auth))
    }

    /// Returns the creation route for repositories owned by `owner`.
    ///
    /// Organizations and personal accounts use different endpoints. The
    /// account type is read from the public profile so the check works with
    /// app installation tokens, which cannot read `/user`.
    async fn creation_route(&self, owner: &str) -> Result<String, HostingError> {
        let account: ApiAccount = self
            .octocrab
            .get(format!("/users/{owner}"), None::<&()>)
            .await
            .map_err(|e| HostingError::from_octocrab("get repository owner", &e))?;

        Ok(if account.kind == "Organization" {
            format!("/orgs/{owner}/repos")
        } else {
            "/user/repos".to_string()
        })
    }

    /// Lists open pull requests, following every page.
    async fn open_pull_requests(
        &self,
        repository: &RepositoryId,
    ) -> Result<Vec<ApiPullRequest>, HostingError> {
        let route = format!("/repos/{}/{}/pulls", repository.owner, repository.name);
        let params = [("state", "open"), ("per_page", PER_PAGE)];

        let page: Page<ApiPullRequest> = self
            .octocrab
            .get(route, Some(&params))
            .await
            .map_err(|e| HostingError::from_octocrab("list pull requests", &e))?;

        self.octocrab
            .all_pages(page)
            .await
            .map_err(|e| HostingError::from_octocrab("list pull requests", &e))
    }
}

#[async_trait]
impl HostingClient for GitHubClient {
    async fn clone_full_history(
        &self,
        repository: &RepositoryId,
        destination: &Path,
    ) -> Result<(), HostingError> {
        let url = self.endpoints.clone_url(repository);
        git::clone(&url, destination, self.endpoints.git_base(), &self.auth).await
    }

    async fn create_repository(
        &self,
        target: &RepositoryId,
        source: &Path,
    ) -> Result<String, HostingError> {
        let default_branch = git::current_branch(source).await?;

        let route = self.creation_route(&target.owner).await?;
        debug!(route = %route, repo = %target, "Creating repository");

        let body = CreateRepository {
            name: &target.name,
            private: true,
        };
        ensure_core_rate_limit(&self.octocrab).await;
        let _: serde_json::Value = self
            .octocrab
            .post(route, Some(&body))
            .await
            .map_err(|e| HostingError::from_octocrab("create repository", &e))?;

        let url = self.endpoints.clone_url(target);
        git::push(source, &url, "HEAD", &default_branch).await?;
        Ok(default_branch)
    }

    async fn push_branch(
        &self,
        source: &Path,
        local_ref: &str,
        target: &RepositoryId,
        branch: &str,
    ) -> Result<(), HostingError> {
        let url = self.endpoints.clone_url(target);
        git::push(source, &url, local_ref, branch).await
    }

    async fn list_open_pull_request_head_branches(
        &self,
        repository: &RepositoryId,
    ) -> Result<Vec<String>, HostingError> {
        let pulls = self.open_pull_requests(repository).await?;
        Ok(pulls.into_iter().map(|pr| pr.head.ref_name).collect())
    }

    async fn list_issues(&self, repository: &RepositoryId) -> Result<Vec<IssueRecord>, HostingError> {
        let route = format!("/repos/{}/{}/issues", repository.owner, repository.name);
        let params = [("state", "all"), ("per_page", PER_PAGE)];

        let page: Page<ApiIssue> = self
            .octocrab
            .get(route, Some(&params))
            .await
            .map_err(|e| HostingError::from_octocrab("list issues", &e))?;
        let issues = self
            .octocrab
            .all_pages(page)
            .await
            .map_err(|e| HostingError::from_octocrab("list issues", &e))?;

        // The issues endpoint also returns pull requests.
        Ok(issues
            .into_iter()
            .filter(|issue| issue.pull_request.is_none())
            .map(ApiIssue::into_record)
            .collect())
    }

    async fn list_pull_requests(
        &self,
        repository: &RepositoryId,
    ) -> Result<Vec<PullRequestRecord>, HostingError> {
        let pulls = self.open_pull_requests(repository).await?;
        Ok(pulls.into_iter().map(ApiPullRequest::into_record).collect())
    }

    async fn create_issue(
        &self,
        repository: &RepositoryId,
        issue: &NewIssue,
    ) -> Result<u64, HostingError> {
        let route = format!("/repos/{}/{}/issues", repository.owner, repository.name);

        ensure_core_rate_limit(&self.octocrab).await;
        let created: ApiCreated = self
            .octocrab
            .post(route, Some(issue))
            .await
            .map_err(|e| HostingError::from_octocrab("create issue", &e))?;
        Ok(created.number)
    }

    async fn create_pull_request(
        &self,
        repository: &RepositoryId,
        pull_request: &NewPullRequest,
    ) -> Result<u64, HostingError> {
        let route = format!("/repos/{}/{}/pulls", repository.owner, repository.name);

        ensure_core_rate_limit(&self.octocrab).await;
        let created: ApiCreated = self
            .octocrab
            .post(route, Some(pull_request))
            .await
            .map_err(|e| HostingError::from_octocrab("create pull request", &e))?;
        Ok(created.number)
    }

    async fn add_collaborator(
        &self,
        repository: &RepositoryId,
        username: &str,
        permission: Permission,
    ) -> Result<(), HostingError> {
        let route = format!(
            "/repos/{}/{}/collaborators/{}",
            repository.owner, repository.name, username
        );
        let body = AddCollaborator {
            permission: permission.as_api_str(),
        };

        // 201 carries an invitation, 204 means access already existed; neither
        // body is needed.
        ensure_core_rate_limit(&self.octocrab).await;
        let response = self
            .octocrab
            ._put(route.as_str(), Some(&body))
            .await
            .map_err(|e| HostingError::from_octocrab("add collaborator", &e))?;
        octocrab::map_github_error(response)
            .await
            .map_err(|e| HostingError::from_octocrab("add collaborator", &e))?;
        Ok(())
    }
}

#[derive(Serialize)]
struct CreateRepository<'a> {
    name: &'a str,
    private: bool,
}

#[derive(Serialize)]
struct AddCollaborator {
    permission: &'static str,
}

#[derive(Deserialize)]
struct ApiCreated {
    number: u64,
}

#[derive(Deserialize)]
struct ApiUser {
    login: String,
}

#[derive(Deserialize)]
struct ApiAccount {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct ApiLabel {
    name: String,
}

#[derive(Deserialize)]
struct ApiIssue {
    number: u64,
    title: String,
    body: Option<String>,
    #[serde(default)]
    labels: Vec<ApiLabel>,
    #[serde(default)]
    assignees: Vec<ApiUser>,
    pull_request: Option<serde_json::Value>,
}

impl ApiIssue {
    fn into_record(self) -> IssueRecord {
        IssueRecord {
            number: self.number,
            title: self.title,
            body: self.body.unwrap_or_default(),
            labels: self.labels.into_iter().map(|l| l.name).collect(),
            assignees: self.assignees.into_iter().map(|a| a.login).collect(),
        }
    }
}

#[derive(Deserialize)]
struct ApiPullRequestHead {
    #[serde(rename = "ref")]
    ref_name: String,
}

#[derive(Deserialize)]
struct ApiPullRequest {
    number: u64,
    title: String,
    body: Option<String>,
    head: ApiPullRequestHead,
}

impl ApiPullRequest {
    fn into_record(self) -> PullRequestRecord {
        PullRequestRecord {
            number: self.number,
            title: self.title,
            body: self.body.unwrap_or_default(),
            head_branch: self.head.ref_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> GitHubClient {
        let endpoints = HostingEndpoints::new(&server.uri(), &server.uri()).unwrap();
        GitHubClient::for_token("test-token", endpoints, GitAuth::Ambient).unwrap()
    }

    fn template() -> RepositoryId {
        RepositoryId::new("acme", "exercise")
    }

    #[tokio::test]
    async fn list_issues_skips_pull_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/exercise/issues"))
            .and(query_param("state", "all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "number": 7,
                    "title": "Add feature",
                    "body": null,
                    "labels": [],
                    "assignees": []
                },
                {
                    "number": 5,
                    "title": "A pull request",
                    "body": "",
                    "labels": [],
                    "assignees": [],
                    "pull_request": { "url": "https://example.com" }
                },
                {
                    "number": 3,
                    "title": "Fix bug",
                    "body": "It breaks",
                    "labels": [{ "name": "bug" }],
                    "assignees": [{ "login": "alice" }]
                }
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let issues = client.list_issues(&template()).await.unwrap();

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].number, 7);
        assert_eq!(issues[0].body, "");
        assert_eq!(issues[1].labels, vec!["bug".to_string()]);
        assert_eq!(issues[1].assignees, vec!["alice".to_string()]);
    }

    #[tokio::test]
    async fn lists_open_pull_request_heads() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/exercise/pulls"))
            .and(query_param("state", "open"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "number": 2,
                    "title": "Feature X",
                    "body": "Refs #1",
                    "head": { "ref": "feature-x" }
                }
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let heads = client
            .list_open_pull_request_head_branches(&template())
            .await
            .unwrap();
        let pulls = client.list_pull_requests(&template()).await.unwrap();

        assert_eq!(heads, vec!["feature-x".to_string()]);
        assert_eq!(pulls[0].head_branch, "feature-x");
        assert_eq!(pulls[0].body, "Refs #1");
    }

    #[tokio::test]
    async fn create_issue_sends_labels_and_assignees() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/acme/exercise-bob/issues"))
            .and(body_json(json!({
                "title": "Fix bug",
                "body": "It breaks",
                "labels": ["bug"],
                "assignees": ["alice"]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "number": 1 })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let number = client
            .create_issue(
                &RepositoryId::new("acme", "exercise-bob"),
                &NewIssue {
                    title: "Fix bug".to_string(),
                    body: "It breaks".to_string(),
                    labels: vec!["bug".to_string()],
                    assignees: vec!["alice".to_string()],
                },
            )
            .await
            .unwrap();

        assert_eq!(number, 1);
    }

    #[tokio::test]
    async fn create_pull_request_surfaces_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/acme/exercise-bob/pulls"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Validation Failed",
                "errors": [{ "resource": "PullRequest", "field": "head", "code": "invalid" }],
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let error = client
            .create_pull_request(
                &RepositoryId::new("acme", "exercise-bob"),
                &NewPullRequest {
                    title: "Feature X".to_string(),
                    body: String::new(),
                    head: "feature-x".to_string(),
                    base: "main".to_string(),
                },
            )
            .await
            .unwrap_err();

        let message = error.to_string();
        assert!(message.starts_with("create pull request failed"));
        assert!(message.contains("Validation Failed"));
    }

    #[tokio::test]
    async fn add_collaborator_requests_push_permission() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/repos/acme/exercise-bob/collaborators/bob"))
            .and(body_json(json!({ "permission": "push" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client
            .add_collaborator(
                &RepositoryId::new("acme", "exercise-bob"),
                "bob",
                Permission::Write,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn add_collaborator_fails_for_unknown_user() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/repos/acme/exercise-bob/collaborators/ghost"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client
            .add_collaborator(
                &RepositoryId::new("acme", "exercise-bob"),
                "ghost",
                Permission::Write,
            )
            .await;

        assert!(matches!(result, Err(HostingError::Api { .. })));
    }

    async fn mount_account(server: &MockServer, login: &str, kind: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/users/{login}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "login": login, "type": kind })),
            )
            .mount(server)
            .await;
        // Installation tokens cannot read the authenticated user.
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "Resource not accessible by integration"
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn organization_owner_uses_org_route() {
        let server = MockServer::start().await;
        mount_account(&server, "acme", "Organization").await;

        let client = client_for(&server).await;
        let route = client.creation_route("acme").await.unwrap();

        assert_eq!(route, "/orgs/acme/repos");
    }

    #[tokio::test]
    async fn user_owner_uses_personal_route() {
        let server = MockServer::start().await;
        mount_account(&server, "alice", "User").await;

        let client = client_for(&server).await;
        let route = client.creation_route("alice").await.unwrap();

        assert_eq!(route, "/user/repos");
    }

    #[tokio::test]
    async fn unknown_owner_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/nobody"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let error = client.creation_route("nobody").await.unwrap_err();

        assert!(error.to_string().starts_with("get repository owner failed"));
    }
}
