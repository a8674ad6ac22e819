//! Candidate collaborator invitation.

use crate::hosting::{HostingClient, HostingError, Permission};
use crate::repository::RepositoryId;
use thiserror::Error;
use tracing::{info, info_span, Instrument};

/// Permission granted to candidates.
pub const CANDIDATE_PERMISSION: Permission = Permission::Write;

/// Errors that can occur while inviting the candidate.
#[derive(Debug, Error)]
pub enum InviteError {
    /// The provider rejected the invitation (e.g. unknown username).
    #[error("Failed to invite '{username}': {source}")]
    Rejected {
        username: String,
        #[source]
        source: HostingError,
    },
}

/// Grants `username` write access to `repository`.
///
/// # Errors
///
/// Returns [`InviteError`] if the provider call fails. Not retried.
pub async fn invite_collaborator<H>(
    hosting: &H,
    repository: &RepositoryId,
    username: &str,
) -> Result<(), InviteError>
where
    H: HostingClient + ?Sized,
{
    let span = info_span!("invite", repo = %repository, username = %username);

    async {
        info!("Inviting candidate");
        hosting
            .add_collaborator(repository, username, CANDIDATE_PERMISSION)
            .await
            .map_err(|source| InviteError::Rejected {
                username: username.to_string(),
                source,
            })?;
        info!("Candidate invited");
        Ok(())
    }
    .instrument(span)
    .await
}
