//! Local `git` invocations used to move history between repositories.

use super::HostingError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// How git authenticates against the hosting provider.
#[derive(Clone, Default)]
pub enum GitAuth {
    /// Rely on the user's configured credential helpers.
    #[default]
    Ambient,

    /// Send the token explicitly as a basic-auth header.
    ///
    /// Used in unattended runs where no interactive credential helper is
    /// available.
    Token(String),
}

impl GitAuth {
    /// Returns the `AUTHORIZATION` header value for token auth.
    pub(crate) fn extra_header(&self) -> Option<String> {
        match self {
            Self::Ambient => None,
            Self::Token(token) => {
                let credentials = STANDARD.encode(format!("x-access-token:{token}"));
                Some(format!("AUTHORIZATION: basic {credentials}"))
            }
        }
    }
}

impl fmt::Debug for GitAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ambient => f.write_str("Ambient"),
            Self::Token(_) => f.write_str("Token(<redacted>)"),
        }
    }
}

/// Clones the full history of `url` into the empty directory `path`.
///
/// With token auth the header is passed for the clone and then persisted in
/// the clone's local config so later pushes are authenticated too.
pub(crate) async fn clone(
    url: &str,
    path: &Path,
    git_base: &str,
    auth: &GitAuth,
) -> Result<(), HostingError> {
    debug!(url, "Cloning repository");

    match auth.extra_header() {
        Some(header) => {
            let setting = format!("http.{git_base}.extraheader={header}");
            run_git(path, &["-c", &setting, "clone", url, "."]).await?;
            let key = format!("http.{git_base}.extraheader");
            run_git(path, &["config", "--local", &key, &header]).await?;
        }
        None => {
            run_git(path, &["clone", url, "."]).await?;
        }
    }

    Ok(())
}

/// Returns the branch checked out in the clone.
pub(crate) async fn current_branch(path: &Path) -> Result<String, HostingError> {
    let output = run_git(path, &["symbolic-ref", "--short", "HEAD"]).await?;
    Ok(output.trim().to_string())
}

/// Pushes `local_ref` to `refs/heads/{branch}` at `url`.
pub(crate) async fn push(
    path: &Path,
    url: &str,
    local_ref: &str,
    branch: &str,
) -> Result<(), HostingError> {
    debug!(url, local_ref, branch, "Pushing branch");

    let refspec = format!("{local_ref}:refs/heads/{branch}");
    run_git(path, &["push", url, &refspec]).await?;
    Ok(())
}

/// Runs a git command in `path`, returning its stdout.
///
/// Errors name only the subcommand so that `-c` values (which may hold
/// credentials) never reach logs.
async fn run_git(path: &Path, args: &[&str]) -> Result<String, HostingError> {
    let command = subcommand(args).to_string();

    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| HostingError::GitSpawn {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(HostingError::Git {
            command,
            message: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Finds the git subcommand, skipping `-c key=value` pairs.
fn subcommand<'a>(args: &[&'a str]) -> &'a str {
    let mut iter = args.iter();
    while let Some(&arg) = iter.next() {
        if arg == "-c" {
            iter.next();
            continue;
        }
        return arg;
    }
    ""
}
