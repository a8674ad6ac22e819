//! Repository identifiers and candidate repository naming.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing an `owner/name` repository identifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryIdError {
    /// The identifier did not contain exactly one `/`.
    #[error("repository '{input}' must be in 'owner/name' format")]
    InvalidFormat { input: String },

    /// The owner or name segment was empty.
    #[error("repository '{input}' has an empty owner or name")]
    EmptySegment { input: String },
}

/// A repository on the hosting provider, identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryId {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl RepositoryId {
    /// Creates an identifier from its parts.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parses an `owner/name` identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryIdError`] if the input is not two non-empty
    /// segments separated by a single `/`.
    pub fn parse(input: &str) -> Result<Self, RepositoryIdError> {
        let mut segments = input.split('/');
        let (Some(owner), Some(name), None) = (segments.next(), segments.next(), segments.next())
        else {
            return Err(RepositoryIdError::InvalidFormat {
                input: input.to_string(),
            });
        };

        if owner.trim().is_empty() || name.trim().is_empty() {
            return Err(RepositoryIdError::EmptySegment {
                input: input.to_string(),
            });
        }

        Ok(Self::new(owner, name))
    }

    /// Derives the candidate repository for a template.
    ///
    /// Format: `{owner}/{template_name}-{candidate}`. The candidate username is
    /// used verbatim; the provider compares usernames case-sensitively.
    #[must_use]
    pub fn for_candidate(owner: &str, template: &RepositoryId, candidate: &str) -> Self {
        Self::new(owner, format!("{}-{}", template.name, candidate))
    }

    /// Returns the `owner/name` form.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryId {
    type Err = RepositoryIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
