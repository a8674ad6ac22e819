//! Base URLs for the REST API and git transport.

use crate::repository::RepositoryId;
use url::Url;

/// Default REST API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default git transport base.
pub const DEFAULT_GIT_BASE: &str = "https://github.com";

/// Where the hosting provider serves its REST API and git repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostingEndpoints {
    api_base: String,
    git_base: String,
}

impl HostingEndpoints {
    /// Parses both base URLs.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] if either URL is malformed.
    pub fn new(api_base: &str, git_base: &str) -> Result<Self, url::ParseError> {
        let api_base = Url::parse(api_base)?;
        let git_base = Url::parse(&with_trailing_slash(git_base))?;
        Ok(Self {
            api_base: api_base.as_str().trim_end_matches('/').to_string(),
            git_base: git_base.to_string(),
        })
    }

    /// Endpoints for github.com.
    #[must_use]
    pub fn github() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            git_base: with_trailing_slash(DEFAULT_GIT_BASE),
        }
    }

    /// REST API base without a trailing slash, as octocrab expects it.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Git transport base, always ending in `/`.
    #[must_use]
    pub fn git_base(&self) -> &str {
        &self.git_base
    }

    /// HTTPS clone URL for a repository.
    #[must_use]
    pub fn clone_url(&self, repository: &RepositoryId) -> String {
        format!(
            "{}{}/{}.git",
            self.git_base(),
            repository.owner,
            repository.name
        )
    }
}

impl Default for HostingEndpoints {
    fn default() -> Self {
        Self::github()
    }
}

fn with_trailing_slash(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}
