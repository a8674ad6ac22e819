//! Hosting client error types.

use thiserror::Error;

/// Errors returned by a [`HostingClient`](super::HostingClient).
///
/// Messages carry the provider's own text (HTTP status, message and
/// validation details, or git's stderr) without further translation.
#[derive(Debug, Error)]
pub enum HostingError {
    /// The REST API rejected a request or could not be reached.
    #[error("{operation} failed: {message}")]
    Api {
        operation: &'static str,
        message: String,
    },

    /// A git command exited unsuccessfully.
    #[error("git {command} failed: {message}")]
    Git { command: String, message: String },

    /// The git executable could not be started.
    #[error("failed to execute git {command}: {source}")]
    GitSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl HostingError {
    /// Converts an octocrab error, keeping GitHub's status, message and
    /// validation details.
    pub(crate) fn from_octocrab(operation: &'static str, error: &octocrab::Error) -> Self {
        let message = match error {
            octocrab::Error::GitHub { source, .. } => {
                let mut message = format!("{} {}", source.status_code, source.message);
                let details: Vec<String> = source
                    .errors
                    .iter()
                    .flatten()
                    .map(|detail| {
                        detail
                            .get("message")
                            .and_then(|m| m.as_str())
                            .map(str::to_string)
                            .unwrap_or_else(|| detail.to_string())
                    })
                    .collect();
                if !details.is_empty() {
                    message.push_str(&format!(" ({})", details.join("; ")));
                }
                message
            }
            other => other.to_string(),
        };

        Self::Api { operation, message }
    }
}
