use std::io;

use thiserror::Error;

use crate::deck::card::CardId;

#[derive(Debug, Error)]
pub enum StudyError {
    #[error("{field} must not be empty")]
    Validation { field: &'static str },

    #[error("no flashcard with id {0}")]
    NotFound(CardId),

    #[error("stored {key} is corrupt: {reason}")]
    CorruptState { key: &'static str, reason: String },

    #[error("{0} is not available")]
    CapabilityUnavailable(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode data: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type StudyResult<T> = Result<T, StudyError>;
