//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::ControllerError;
use quiz_core::model::SummaryError;
use storage::repository::StorageError;

/// Errors emitted by `QuizRunner`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunnerError {
    #[error("quiz runner must be used inside a tokio runtime")]
    NoRuntime,
    #[error("controller lock poisoned: {0}")]
    Poisoned(String),
    #[error(transparent)]
    Controller(#[from] ControllerError),
}

/// Errors emitted by round services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RoundError {
    #[error("no prompts available for round")]
    Empty,
    #[error("round already completed")]
    Completed,
    #[error("round is not complete yet")]
    Incomplete,
    #[error("current prompt is still pending")]
    Pending,
    #[error("resolution for prompt {0} does not match the current prompt")]
    UnexpectedResolution(u64),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error(transparent)]
    Runner(#[from] RunnerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
