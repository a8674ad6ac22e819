//! Transcribed issue information.

use serde::Serialize;

/// An issue recreated in the candidate repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscribedIssue {
    /// Issue number in the template repository.
    pub source_number: u64,

    /// Issue number assigned by the candidate repository.
    pub number: u64,

    /// Issue title.
    pub title: String,
}
