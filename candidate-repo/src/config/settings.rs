//! Config file deserialization.

use super::ConfigError;
use crate::hosting::{HostingEndpoints, DEFAULT_API_BASE, DEFAULT_GIT_BASE};
use crate::repository::RepositoryId;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Parsed contents of a `candidate-repo.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// Values used when the command line omits them.
    #[serde(default)]
    pub defaults: DefaultSettings,

    /// Provider endpoints.
    #[serde(default)]
    pub hosting: HostingSettings,
}

/// The `[defaults]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DefaultSettings {
    /// Owner (user or organization) of created repositories.
    pub owner: Option<String>,

    /// Template repository in `owner/name` format.
    pub template: Option<String>,

    /// Whether candidates are invited as collaborators.
    #[serde(default = "default_invite")]
    pub invite: bool,
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            owner: None,
            template: None,
            invite: default_invite(),
        }
    }
}

/// The `[hosting]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct HostingSettings {
    /// REST API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Base URL repositories are cloned from and pushed to.
    #[serde(default = "default_git_base")]
    pub git_base: String,
}

impl Default for HostingSettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            git_base: default_git_base(),
        }
    }
}

pub(crate) fn default_invite() -> bool {
    true
}

pub(crate) fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

pub(crate) fn default_git_base() -> String {
    DEFAULT_GIT_BASE.to_string()
}

impl Settings {
    /// Loads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed or fails
    /// validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading config file");

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;

        settings.validate(path)?;
        Ok(settings)
    }

    /// Validates field formats.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first invalid
    /// field.
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: path.display().to_string(),
            message,
        };

        if let Some(template) = &self.defaults.template {
            RepositoryId::parse(template)
                .map_err(|e| invalid(format!("defaults.template: {e}")))?;
        }

        if let Some(owner) = &self.defaults.owner {
            if owner.trim().is_empty() {
                return Err(invalid("defaults.owner is empty".to_string()));
            }
        }

        if Url::parse(&self.hosting.api_base).is_err() {
            return Err(invalid(format!(
                "hosting.api-base is not a valid URL: {}",
                self.hosting.api_base
            )));
        }

        if Url::parse(&self.hosting.git_base).is_err() {
            return Err(invalid(format!(
                "hosting.git-base is not a valid URL: {}",
                self.hosting.git_base
            )));
        }

        Ok(())
    }

    /// Returns the configured provider endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if a base URL is malformed.
    pub fn endpoints(&self) -> Result<HostingEndpoints, ConfigError> {
        HostingEndpoints::new(&self.hosting.api_base, &self.hosting.git_base).map_err(|e| {
            ConfigError::ValidationError {
                path: "[hosting]".to_string(),
                message: e.to_string(),
            }
        })
    }
}
