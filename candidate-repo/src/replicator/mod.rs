//! Template repository replication.
//!
//! Clones the template's full history into a scoped temporary directory,
//! creates the private candidate repository from it, and pushes every branch
//! an open pull request depends on.

mod branch_set;
mod error;

pub use branch_set::{remote_tracking_ref, BranchSet};
pub use error::ReplicateError;

use crate::hosting::HostingClient;
use crate::repository::RepositoryId;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, info_span, warn, Instrument};

/// Prefix for temporary clone directories.
const WORKDIR_PREFIX: &str = "candidate-repo-";

/// A candidate repository whose history and branches have been pushed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplicatedRepository {
    /// The created repository.
    pub repository: RepositoryId,

    /// Default branch pushed at creation.
    pub default_branch: String,

    /// Pull request head branches pushed after creation.
    pub branches: Vec<String>,
}

/// Replicates `template` into the new private repository `target`.
///
/// This function:
/// 1. Creates a temporary working directory
/// 2. Clones the template's full history into it
/// 3. Collects the head branches of the template's open pull requests
/// 4. Creates the target repository and pushes the default branch
/// 5. Pushes every head branch from its remote-tracking ref
///
/// The working directory is removed on every path, including failures.
/// Both reads happen before the target is created, so an inaccessible
/// template aborts the run before anything is mutated.
///
/// # Errors
///
/// Returns [`ReplicateError`] if any step fails. No step is retried. A push
/// failure after creation is reported as [`ReplicateError::PushBranch`],
/// which carries what was replicated up to that point.
pub async fn replicate_repository<H>(
    hosting: &H,
    template: &RepositoryId,
    target: &RepositoryId,
) -> Result<ReplicatedRepository, ReplicateError>
where
    H: HostingClient + ?Sized,
{
    let span = info_span!("replicate", template = %template, target = %target);

    async {
        info!("Replicating template repository");

        let workdir = tempfile::Builder::new()
            .prefix(WORKDIR_PREFIX)
            .tempdir()
            .map_err(|source| ReplicateError::WorkingDirectory { source })?;
        debug!(path = %workdir.path().display(), "Created working directory");

        let result = replicate_into(hosting, template, target, workdir.path()).await;

        let path = workdir.path().to_path_buf();
        if let Err(e) = workdir.close() {
            warn!(path = %path.display(), error = %e, "Failed to remove working directory");
        }

        result
    }
    .instrument(span)
    .await
}

async fn replicate_into<H>(
    hosting: &H,
    template: &RepositoryId,
    target: &RepositoryId,
    workdir: &Path,
) -> Result<ReplicatedRepository, ReplicateError>
where
    H: HostingClient + ?Sized,
{
    hosting.clone_full_history(template, workdir).await?;
    info!("Cloned template history");

    let heads = hosting
        .list_open_pull_request_head_branches(template)
        .await?;
    let branch_set = BranchSet::from_heads(heads)?;
    debug!(count = branch_set.len(), "Collected pull request head branches");

    let default_branch = hosting.create_repository(target, workdir).await?;
    info!(default_branch = %default_branch, "Created private repository");

    let mut replicated = ReplicatedRepository {
        repository: target.clone(),
        default_branch,
        branches: Vec::with_capacity(branch_set.len()),
    };
    for branch in branch_set.iter() {
        if branch == replicated.default_branch {
            warn!(branch, "Pull request head is the default branch, already pushed");
            continue;
        }

        if let Err(source) = hosting
            .push_branch(workdir, &remote_tracking_ref(branch), target, branch)
            .await
        {
            return Err(ReplicateError::PushBranch {
                branch: branch.to_string(),
                replicated: Box::new(replicated),
                source,
            });
        }
        debug!(branch, "Pushed branch");
        replicated.branches.push(branch.to_string());
    }

    info!(branches = replicated.branches.len(), "Replication complete");
    Ok(replicated)
}
