//! Pull request transcription error types.

use crate::hosting::HostingError;
use thiserror::Error;

/// Errors that can occur while transcribing pull requests.
#[derive(Debug, Error)]
pub enum PrError {
    /// Listing the template's pull requests failed.
    #[error("Failed to list template pull requests: {0}")]
    List(#[source] HostingError),

    /// Creating the copy of a template pull request failed.
    ///
    /// A missing head branch in the candidate repository surfaces here.
    #[error("Failed to transcribe pull request #{number} ({head}): {source}")]
    Create {
        /// Number of the pull request in the template.
        number: u64,
        /// Head branch of the pull request.
        head: String,
        #[source]
        source: HostingError,
    },
}
