//! Pull request transcription.
//!
//! Recreates the template's open pull requests against the branches pushed
//! during replication. Reviews and comments are not copied.

mod error;
mod transcribed_pr;

pub use error::PrError;
pub use transcribed_pr::TranscribedPullRequest;

use crate::hosting::{HostingClient, NewPullRequest, PullRequestRecord};
use crate::repository::RepositoryId;
use tracing::{debug, info, info_span, Instrument};

/// Reads the template's open pull requests in ascending number order.
///
/// # Errors
///
/// Returns [`PrError::List`] if the provider call fails.
pub async fn load_pull_requests<H>(
    hosting: &H,
    template: &RepositoryId,
) -> Result<Vec<PullRequestRecord>, PrError>
where
    H: HostingClient + ?Sized,
{
    let mut pull_requests = hosting
        .list_pull_requests(template)
        .await
        .map_err(PrError::List)?;
    pull_requests.sort_by_key(|pr| pr.number);
    Ok(pull_requests)
}

/// Transcribes every open template pull request into `target`.
///
/// Each pull request merges its replicated head branch into `base`, the
/// candidate repository's default branch. Creation is sequential in
/// ascending source-number order.
///
/// Head branches must already exist in `target`; a missing one fails at
/// creation time.
///
/// # Errors
///
/// Returns [`PrError`] on the first failing call.
pub async fn transcribe_pull_requests<H>(
    hosting: &H,
    template: &RepositoryId,
    target: &RepositoryId,
    base: &str,
) -> Result<Vec<TranscribedPullRequest>, PrError>
where
    H: HostingClient + ?Sized,
{
    let span = info_span!(
        "transcribe_pull_requests",
        template = %template,
        target = %target,
        base = %base
    );

    async {
        let pull_requests = load_pull_requests(hosting, template).await?;
        info!(count = pull_requests.len(), "Transcribing pull requests");

        let mut transcribed = Vec::with_capacity(pull_requests.len());
        for pull_request in &pull_requests {
            let payload = NewPullRequest::from_record(pull_request, base);
            let number = hosting
                .create_pull_request(target, &payload)
                .await
                .map_err(|source| PrError::Create {
                    number: pull_request.number,
                    head: pull_request.head_branch.clone(),
                    source,
                })?;
            debug!(source_number = pull_request.number, number, "Pull request created");

            transcribed.push(TranscribedPullRequest {
                source_number: pull_request.number,
                number,
                head: payload.head,
                base: payload.base,
            });
        }

        info!(count = transcribed.len(), "Pull requests transcribed");
        Ok(transcribed)
    }
    .instrument(span)
    .await
}
