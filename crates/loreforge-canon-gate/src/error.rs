use loreforge_canon_types::{ContentKey, QueueStatus};
use thiserror::Error;

/// Errors from the publishing queue.
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("a submission for {0} is already in flight")]
    InFlight(ContentKey),

    #[error("no queue entry for {0}")]
    NotFound(ContentKey),

    #[error("invalid transition for {key}: entry is {from}")]
    InvalidTransition { key: ContentKey, from: QueueStatus },
}

/// Errors from the external content store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("content store unavailable: {0}")]
    Unavailable(String),

    #[error("content {0} not found in store")]
    NotFound(ContentKey),
}

/// Errors from the validation log store.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("validation log unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the Canon Gate.
///
/// Rejected and flagged outcomes are NOT errors; they are successful
/// verdicts carrying a negative answer. Only duplicate in-flight
/// submissions and internal failures are errors, and only the latter are
/// retryable.
#[derive(Error, Debug)]
pub enum GateError {
    #[error("a submission for {0} is already validating; poll status instead of resubmitting")]
    Conflict(ContentKey),

    #[error("no submission recorded for {0}")]
    UnknownContent(ContentKey),

    #[error("manual review does not apply to {key}: entry is {status}")]
    InvalidReview { key: ContentKey, status: QueueStatus },

    #[error("validation pipeline failure: {0}")]
    Internal(String),

    #[error("content store error: {0}")]
    Store(#[from] StoreError),

    #[error("validation log error: {0}")]
    Log(#[from] LogError),
}

impl From<QueueError> for GateError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::InFlight(key) => GateError::Conflict(key),
            QueueError::NotFound(key) => GateError::UnknownContent(key),
            QueueError::InvalidTransition { key, from } => GateError::InvalidReview {
                key,
                status: from,
            },
        }
    }
}

impl GateError {
    /// Whether the caller may retry the same call unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GateError::Internal(_) | GateError::Store(_) | GateError::Log(_)
        )
    }
}
