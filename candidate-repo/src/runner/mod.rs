//! Orchestrates a replication run.
//!
//! A run walks the [`Stage`] machine forward, handing each stage to its
//! component. The first failure ends the run; nothing created before it is
//! removed.

mod config;
mod error;
mod plan;
mod stage;

pub use config::RunnerConfig;
pub use error::{RunFailure, RunnerError};
pub use plan::ReplicationPlan;
pub use stage::Stage;

use crate::hosting::{GitHubClient, HostingClient};
use crate::invite::invite_collaborator;
use crate::issues::{load_issues, transcribe_issues};
use crate::pull_requests::{load_pull_requests, transcribe_pull_requests};
use crate::replicator::{replicate_repository, BranchSet, ReplicateError};
use crate::summary::RunSummary;
use tracing::{error, info, info_span, Instrument};

/// Creates one candidate repository from a template.
pub struct Runner<H = GitHubClient> {
    config: RunnerConfig,
    hosting: H,
}

impl Runner<GitHubClient> {
    /// Builds a runner backed by GitHub.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::MissingToken`] without a token, or
    /// [`RunnerError::Octocrab`] if the client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let token = config.token().ok_or(RunnerError::MissingToken)?;
        let hosting =
            GitHubClient::for_token(token, config.endpoints().clone(), config.git_auth())?;
        Ok(Self::with_client(config, hosting))
    }
}

impl<H: HostingClient> Runner<H> {
    /// Builds a runner over an existing hosting client.
    pub fn with_client(config: RunnerConfig, hosting: H) -> Self {
        Self { config, hosting }
    }

    /// Returns the run configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Executes the full replication procedure.
    ///
    /// # Errors
    ///
    /// Returns [`RunFailure`] naming the stage that failed, with a summary of
    /// everything created before it.
    pub async fn run(&self) -> Result<RunSummary, RunFailure> {
        let template = self.config.template().clone();
        let target = self.config.target();
        let span = info_span!(
            "run",
            template = %template,
            target = %target,
            candidate = %self.config.candidate()
        );

        async {
            let mut summary = RunSummary::new(template, target);
            info!("Starting replication run");

            while let Some(next) = summary.stage.next(self.config.invite()) {
                if let Err(source) = self.enter(next, &mut summary).await {
                    error!(stage = %next, error = %source, "Run failed");
                    return Err(RunFailure {
                        stage: next,
                        summary,
                        source,
                    });
                }
                summary.stage = next;
                info!(stage = %next, "Reached stage");
            }

            Ok(summary)
        }
        .instrument(span)
        .await
    }

    /// Performs the work that leads into `stage`.
    async fn enter(&self, stage: Stage, summary: &mut RunSummary) -> Result<(), RunnerError> {
        let template = self.config.template();
        let target = summary.repository.clone();

        match stage {
            Stage::Start | Stage::Done => {}
            Stage::Replicated => {
                match replicate_repository(&self.hosting, template, &target).await {
                    Ok(replicated) => summary.record_replication(replicated),
                    Err(e) => {
                        if let Some(partial) = e.partial() {
                            summary.record_replication(partial.clone());
                        }
                        return Err(e.into());
                    }
                }
            }
            Stage::Invited => {
                invite_collaborator(&self.hosting, &target, self.config.candidate()).await?;
                summary.record_invite();
            }
            Stage::IssuesTranscribed => {
                let issues = transcribe_issues(&self.hosting, template, &target).await?;
                summary.record_issues(issues);
            }
            Stage::PullRequestsTranscribed => {
                let base = summary
                    .default_branch
                    .clone()
                    .ok_or(RunnerError::MissingDefaultBranch)?;
                let pull_requests =
                    transcribe_pull_requests(&self.hosting, template, &target, &base).await?;
                summary.record_pull_requests(pull_requests);
            }
        }

        Ok(())
    }

    /// Gathers what a run would create using read calls only.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the template cannot be read or one of its
    /// head branches is not a valid branch name.
    pub async fn plan(&self) -> Result<ReplicationPlan, RunnerError> {
        let template = self.config.template();
        let span = info_span!("plan", template = %template);

        async {
            info!("Planning replication run");

            let heads = self
                .hosting
                .list_open_pull_request_head_branches(template)
                .await
                .map_err(ReplicateError::from)?;
            let branches = BranchSet::from_heads(heads)?;
            let issues = load_issues(&self.hosting, template).await?;
            let pull_requests = load_pull_requests(&self.hosting, template).await?;

            Ok(ReplicationPlan {
                template: template.clone(),
                target: self.config.target(),
                branches: branches.iter().map(str::to_string).collect(),
                issues,
                pull_requests,
                invite: self
                    .config
                    .invite()
                    .then(|| self.config.candidate().to_string()),
            })
        }
        .instrument(span)
        .await
    }
}
