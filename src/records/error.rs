//! Error types for the purchase record book.

use actor_framework::FrameworkError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecordError {
    /// A record for the pair exists already.
    #[error("Purchase already recorded: {0}")]
    AlreadyRecorded(String),

    #[error("Record book busy")]
    Busy,

    #[error("Record book unavailable: {0}")]
    Unavailable(String),
}

impl From<FrameworkError> for RecordError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::AlreadyExists(key) => RecordError::AlreadyRecorded(key),
            FrameworkError::Timeout => RecordError::Busy,
            other => RecordError::Unavailable(other.to_string()),
        }
    }
}
