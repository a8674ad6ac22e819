//! Replication run stages.

use serde::Serialize;
use std::fmt;

/// Progress of a replication run.
///
/// Stages only move forward. [`Stage::Invited`] is skipped when invitation
/// is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Nothing has happened yet.
    Start,
    /// The candidate repository exists with every required branch.
    Replicated,
    /// The candidate has been granted access.
    Invited,
    /// Every template issue has been recreated.
    IssuesTranscribed,
    /// Every open template pull request has been recreated.
    PullRequestsTranscribed,
    /// The run completed.
    Done,
}

impl Stage {
    /// Returns the stage that follows `self`, or `None` at [`Stage::Done`].
    #[must_use]
    pub fn next(self, invite: bool) -> Option<Stage> {
        match self {
            Stage::Start => Some(Stage::Replicated),
            Stage::Replicated if invite => Some(Stage::Invited),
            Stage::Replicated | Stage::Invited => Some(Stage::IssuesTranscribed),
            Stage::IssuesTranscribed => Some(Stage::PullRequestsTranscribed),
            Stage::PullRequestsTranscribed => Some(Stage::Done),
            Stage::Done => None,
        }
    }

    /// Describes the work done to reach this stage.
    #[must_use]
    pub fn activity(self) -> &'static str {
        match self {
            Stage::Start => "starting",
            Stage::Replicated => "replicating the repository",
            Stage::Invited => "inviting the candidate",
            Stage::IssuesTranscribed => "transcribing issues",
            Stage::PullRequestsTranscribed => "transcribing pull requests",
            Stage::Done => "finishing",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Replicated => "replicated",
            Stage::Invited => "invited",
            Stage::IssuesTranscribed => "issues-transcribed",
            Stage::PullRequestsTranscribed => "prs-transcribed",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(invite: bool) -> Vec<Stage> {
        let mut stages = vec![Stage::Start];
        while let Some(next) = stages.last().and_then(|s| s.next(invite)) {
            stages.push(next);
        }
        stages
    }

    #[test]
    fn invite_stage_runs_before_issues() {
        assert_eq!(
            walk(true),
            vec![
                Stage::Start,
                Stage::Replicated,
                Stage::Invited,
                Stage::IssuesTranscribed,
                Stage::PullRequestsTranscribed,
                Stage::Done,
            ]
        );
    }

    #[test]
    fn skipping_invite_omits_stage() {
        assert!(!walk(false).contains(&Stage::Invited));
    }

    #[test]
    fn stages_only_move_forward() {
        for invite in [true, false] {
            let stages = walk(invite);
            assert!(stages.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn display_uses_kebab_case() {
        assert_eq!(Stage::PullRequestsTranscribed.to_string(), "prs-transcribed");
    }
}
