//! CLI for creating per-candidate repositories.
//!
//! Replicates a template repository into a new private repository named
//! after the candidate, recreates its issues and open pull requests, and
//! invites the candidate as a collaborator.

use candidate_repo::{
    load_settings, ConfigError, ReplicationPlan, RunFailure, RunSummary, Runner, RunnerConfig,
    RunnerError,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Candidate Repo - Create a private copy of a template repository for a candidate.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GitHub username of the candidate.
    candidate: String,

    /// Template repository in owner/name format.
    #[arg(long)]
    template: Option<String>,

    /// Owner (user or organization) of the new repository.
    #[arg(long)]
    owner: Option<String>,

    /// Do not invite the candidate as a collaborator.
    #[arg(long)]
    skip_invite: bool,

    /// Show what would be created without changing anything.
    #[arg(long)]
    dry_run: bool,

    /// Path to a candidate-repo.toml config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Authenticate git with the token instead of local credential helpers.
    #[arg(long, env = "GITHUB_ACTIONS")]
    unattended: bool,
}

/// Outcome of a completed invocation.
enum Outcome {
    Planned(ReplicationPlan),
    Replicated(RunSummary),
}

/// Reasons an invocation did not complete.
enum Failure {
    /// Bad input detected before anything was changed.
    Precondition(RunnerError),
    /// The run stopped part way through.
    Run(RunFailure),
}

impl From<ConfigError> for Failure {
    fn from(e: ConfigError) -> Self {
        Failure::Precondition(e.into())
    }
}

impl From<RunnerError> for Failure {
    fn from(e: RunnerError) -> Self {
        Failure::Precondition(e)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    // Both rustls providers can be compiled in through dependencies.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = Args::parse();

    match run(args).await {
        Ok(Outcome::Planned(plan)) => {
            print_plan(&plan);
            ExitCode::SUCCESS
        }
        Ok(Outcome::Replicated(summary)) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(Failure::Run(failure)) => {
            error!(error = %failure, "Replication failed");
            print_summary(&failure.summary);
            ExitCode::from(1)
        }
        Err(Failure::Precondition(e)) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with a compact format, filtered by `RUST_LOG`
/// (default `info`).
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<Outcome, Failure> {
    let settings = load_settings(args.config.as_deref())?;

    let mut config = RunnerConfig::from_settings(
        &settings,
        &args.candidate,
        args.template.as_deref(),
        args.owner.as_deref(),
    )?
    .with_token(args.token)
    .with_unattended(args.unattended);
    if args.skip_invite {
        config = config.with_invite(false);
    }

    let runner = Runner::new(config)?;

    if args.dry_run {
        return Ok(Outcome::Planned(runner.plan().await?));
    }

    runner.run().await.map(Outcome::Replicated).map_err(Failure::Run)
}

/// Prints what a run would create.
fn print_plan(plan: &ReplicationPlan) {
    println!("\nPlan (dry run):");
    println!("  Template: {}", plan.template);
    println!("  Repository to create: {} (private)", plan.target);
    println!("  Branches to push: {}", plan.branches.len());
    for branch in &plan.branches {
        println!("    {branch}");
    }
    println!("  Issues to create: {}", plan.issues.len());
    for issue in &plan.issues {
        println!("    #{} {}", issue.number, issue.title);
    }
    println!("  Pull requests to create: {}", plan.pull_requests.len());
    for pull_request in &plan.pull_requests {
        println!(
            "    #{} {} ({})",
            pull_request.number, pull_request.title, pull_request.head_branch
        );
    }
    match &plan.invite {
        Some(candidate) => println!("  Invite: {candidate}"),
        None => println!("  Invite: skipped"),
    }
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!("  Repository: {}", summary.repository);
    println!("  Stage reached: {}", summary.stage);

    if let Some(default_branch) = &summary.default_branch {
        println!("  Default branch: {default_branch}");
        if !summary.is_complete() {
            println!("  Repository left in place for inspection");
        }
    }
    println!("  Branches pushed: {}", summary.branches_pushed.len());
    println!(
        "  Candidate invited: {}",
        if summary.invited { "yes" } else { "no" }
    );

    println!("  Issues created: {}", summary.issues.len());
    for issue in &summary.issues {
        println!("    #{} -> #{}", issue.source_number, issue.number);
    }
    println!("  Pull requests created: {}", summary.pull_requests.len());
    for pull_request in &summary.pull_requests {
        println!(
            "    #{} -> #{} ({} -> {})",
            pull_request.source_number, pull_request.number, pull_request.head, pull_request.base
        );
    }
}
