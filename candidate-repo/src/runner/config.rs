//! Runner configuration.

use crate::config::{ConfigError, Settings};
use crate::hosting::{GitAuth, HostingEndpoints};
use crate::repository::RepositoryId;

/// Configuration for one replication run.
///
/// Everything the procedure needs is passed in here; nothing is read from
/// global state.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Repository to replicate.
    template: RepositoryId,
    /// Owner of the candidate repository.
    owner: String,
    /// Candidate username.
    candidate: String,
    /// Whether to invite the candidate.
    invite: bool,
    /// GitHub token used for API calls.
    token: Option<String>,
    /// Send the token to git explicitly instead of using credential helpers.
    unattended: bool,
    /// Provider endpoints.
    endpoints: HostingEndpoints,
}

impl RunnerConfig {
    /// Creates a configuration with invitation enabled and github.com
    /// endpoints.
    pub fn new(template: RepositoryId, owner: impl Into<String>, candidate: impl Into<String>) -> Self {
        Self {
            template,
            owner: owner.into(),
            candidate: candidate.into(),
            invite: true,
            token: None,
            unattended: false,
            endpoints: HostingEndpoints::github(),
        }
    }

    /// Builds a configuration from config file settings, letting command
    /// line values override the file's defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingValue`] if neither source provides the
    /// template or owner, and [`ConfigError::InvalidArgument`] if the
    /// template is not in `owner/name` format.
    pub fn from_settings(
        settings: &Settings,
        candidate: &str,
        template: Option<&str>,
        owner: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let template = template
            .or(settings.defaults.template.as_deref())
            .ok_or(ConfigError::MissingValue { name: "template" })?;
        let template =
            RepositoryId::parse(template).map_err(|e| ConfigError::InvalidArgument {
                name: "template",
                message: e.to_string(),
            })?;

        let owner = owner
            .or(settings.defaults.owner.as_deref())
            .ok_or(ConfigError::MissingValue { name: "owner" })?;

        Ok(Self::new(template, owner, candidate)
            .with_invite(settings.defaults.invite)
            .with_endpoints(settings.endpoints()?))
    }

    /// Enables or disables the invitation step.
    pub fn with_invite(mut self, invite: bool) -> Self {
        self.invite = invite;
        self
    }

    /// Sets the API token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Selects explicit token authentication for git.
    pub fn with_unattended(mut self, unattended: bool) -> Self {
        self.unattended = unattended;
        self
    }

    /// Sets the provider endpoints.
    pub fn with_endpoints(mut self, endpoints: HostingEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Returns the template repository.
    pub fn template(&self) -> &RepositoryId {
        &self.template
    }

    /// Returns the owner of the candidate repository.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the candidate username.
    pub fn candidate(&self) -> &str {
        &self.candidate
    }

    /// Returns whether the candidate is invited.
    pub fn invite(&self) -> bool {
        self.invite
    }

    /// Returns the configured token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the provider endpoints.
    pub fn endpoints(&self) -> &HostingEndpoints {
        &self.endpoints
    }

    /// Returns the candidate repository derived from template, owner and
    /// candidate.
    pub fn target(&self) -> RepositoryId {
        RepositoryId::for_candidate(&self.owner, &self.template, &self.candidate)
    }

    /// Returns how git should authenticate.
    pub fn git_auth(&self) -> GitAuth {
        match (&self.token, self.unattended) {
            (Some(token), true) => GitAuth::Token(token.clone()),
            _ => GitAuth::Ambient,
        }
    }
}
