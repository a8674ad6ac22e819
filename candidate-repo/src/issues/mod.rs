//! Issue transcription.
//!
//! Recreates every template issue in the candidate repository, carrying over
//! title, body, labels and assignees. Comments are not copied.

mod error;
mod transcribed_issue;

pub use error::IssueError;
pub use transcribed_issue::TranscribedIssue;

use crate::hosting::{HostingClient, IssueRecord, NewIssue};
use crate::repository::RepositoryId;
use tracing::{debug, info, info_span, Instrument};

/// Reads the template's issues, open and closed, in ascending number order.
///
/// # Errors
///
/// Returns [`IssueError::List`] if the provider call fails.
pub async fn load_issues<H>(
    hosting: &H,
    template: &RepositoryId,
) -> Result<Vec<IssueRecord>, IssueError>
where
    H: HostingClient + ?Sized,
{
    let mut issues = hosting
        .list_issues(template)
        .await
        .map_err(IssueError::List)?;
    issues.sort_by_key(|issue| issue.number);
    Ok(issues)
}

/// Transcribes every template issue into `target`.
///
/// Issues are sorted before the first creation call and created one at a
/// time, so destination numbers follow the template's relative order.
/// Absolute numbers are not preserved.
///
/// Labels must already exist in `target` and assignees must already have
/// access; the provider enforces both.
///
/// # Errors
///
/// Returns [`IssueError`] on the first failing call. Issues created before
/// the failure remain in place.
pub async fn transcribe_issues<H>(
    hosting: &H,
    template: &RepositoryId,
    target: &RepositoryId,
) -> Result<Vec<TranscribedIssue>, IssueError>
where
    H: HostingClient + ?Sized,
{
    let span = info_span!("transcribe_issues", template = %template, target = %target);

    async {
        let issues = load_issues(hosting, template).await?;
        info!(count = issues.len(), "Transcribing issues");

        let mut transcribed = Vec::with_capacity(issues.len());
        for issue in &issues {
            let number = hosting
                .create_issue(target, &NewIssue::from(issue))
                .await
                .map_err(|source| IssueError::Create {
                    number: issue.number,
                    source,
                })?;
            debug!(source_number = issue.number, number, "Issue created");

            transcribed.push(TranscribedIssue {
                source_number: issue.number,
                number,
                title: issue.title.clone(),
            });
        }

        info!(count = transcribed.len(), "Issues transcribed");
        Ok(transcribed)
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosting::memory::{HostedRepository, HostingCall, InMemoryHosting};

    fn issue(number: u64, title: &str, labels: &[&str]) -> IssueRecord {
        IssueRecord {
            number,
            title: title.to_string(),
            body: format!("Body of {title}"),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            assignees: Vec::new(),
        }
    }

    fn setup(template_issues: Vec<IssueRecord>) -> (InMemoryHosting, RepositoryId, RepositoryId) {
        let hosting = InMemoryHosting::new();
        let template = RepositoryId::new("templates", "exercise");
        let mut repository = HostedRepository::new("main");
        for issue in template_issues {
            repository = repository.with_issue(issue);
        }
        hosting.add_repository(template.clone(), repository);

        let target = RepositoryId::new("acme", "exercise-bob");
        hosting.add_repository(target.clone(), HostedRepository::new("main"));
        (hosting, template, target)
    }

    #[tokio::test]
    async fn creates_issues_in_source_order() {
        let (hosting, template, target) = setup(vec![
            issue(12, "Third", &[]),
            issue(2, "First", &["bug"]),
            issue(5, "Second", &[]),
        ]);

        let transcribed = transcribe_issues(&hosting, &template, &target)
            .await
            .unwrap();

        let order: Vec<(u64, u64)> = transcribed
            .iter()
            .map(|t| (t.source_number, t.number))
            .collect();
        assert_eq!(order, vec![(2, 1), (5, 2), (12, 3)]);

        let titles: Vec<String> = hosting
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                HostingCall::CreateIssue { issue, .. } => Some(issue.title),
                _ => None,
            })
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn copies_content_verbatim() {
        let (hosting, template, target) = setup(vec![issue(1, "Only", &["bug", "question"])]);

        transcribe_issues(&hosting, &template, &target)
            .await
            .unwrap();

        let created = hosting.repository(&target).unwrap();
        assert_eq!(created.issues[0].body, "Body of Only");
        assert_eq!(created.issues[0].labels, vec!["bug", "question"]);
    }

    #[tokio::test]
    async fn unknown_label_stops_transcription() {
        let (hosting, template, target) = setup(vec![
            issue(1, "Fine", &[]),
            issue(2, "Custom label", &["needs-triage"]),
            issue(3, "Never reached", &[]),
        ]);

        let result = transcribe_issues(&hosting, &template, &target).await;

        assert!(matches!(result, Err(IssueError::Create { number: 2, .. })));
        let created = hosting.repository(&target).unwrap();
        assert_eq!(created.issues.len(), 1);
    }

    #[tokio::test]
    async fn empty_template_creates_nothing() {
        let (hosting, template, target) = setup(Vec::new());

        let transcribed = transcribe_issues(&hosting, &template, &target)
            .await
            .unwrap();

        assert!(transcribed.is_empty());
    }
}
