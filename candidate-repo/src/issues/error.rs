//! Issue transcription error types.

use crate::hosting::HostingError;
use thiserror::Error;

/// Errors that can occur while transcribing issues.
#[derive(Debug, Error)]
pub enum IssueError {
    /// Listing the template's issues failed.
    #[error("Failed to list template issues: {0}")]
    List(#[source] HostingError),

    /// Creating the copy of a template issue failed.
    #[error("Failed to transcribe issue #{number}: {source}")]
    Create {
        /// Number of the issue in the template.
        number: u64,
        #[source]
        source: HostingError,
    },
}
