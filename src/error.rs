//! Error type shared by the whole trainer core.

use crate::models::SessionKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    /// No cards qualify for the requested session type.
    #[error("{}", empty_pool_message(.0))]
    EmptyPool(SessionKind),

    #[error("{0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// A destructive operation was requested without confirmation.
    /// Carries the prompt to show to the user.
    #[error("{0}")]
    ConfirmationRequired(String),

    #[error("no active session")]
    NoActiveSession,

    #[error("session is not accepting this action: {0}")]
    InvalidSessionState(&'static str),

    #[error("a recording is already in progress")]
    RecordingInProgress,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn empty_pool_message(kind: &SessionKind) -> &'static str {
    match kind {
        SessionKind::Learn => "No new words to learn!",
        SessionKind::Practice => "No cards are ready to practice right now.",
    }
}

pub type Result<T> = std::result::Result<T, TrainerError>;

/// Whether the user has already agreed to a destructive operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Unconfirmed,
    Confirmed,
}

impl Confirmation {
    /// Returns `ConfirmationRequired(prompt)` unless confirmed.
    pub fn require(self, prompt: impl FnOnce() -> String) -> Result<()> {
        match self {
            Confirmation::Confirmed => Ok(()),
            Confirmation::Unconfirmed => Err(TrainerError::ConfirmationRequired(prompt())),
        }
    }
}
