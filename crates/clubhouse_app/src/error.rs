//! Error types for clubhouse_app

use clubhouse_forms::FormError;
use thiserror::Error;

use crate::saga::SagaStep;

/// Failure reported by a remote collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<anyhow::Error> for BackendError {
    fn from(err: anyhow::Error) -> Self {
        BackendError(format!("{err:#}"))
    }
}

/// Input rejected before any remote call
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing meeting title.")]
    MissingTitle,
    #[error("Missing start time for meeting.")]
    MissingStart,
    #[error("Missing end time for meeting.")]
    MissingEnd,
    #[error("Meeting end time cannot be before meeting start time.")]
    EndBeforeStart,
    #[error("The selected room is no longer available. Pick another room.")]
    RoomUnavailable,
    #[error("Charter field `{field}` is missing or invalid.")]
    InvalidCharter { field: &'static str },
    #[error("Missing strike reason.")]
    MissingReason,
    #[error("No organization selected.")]
    NoOrganization,
}

/// Errors that can occur in clubhouse workflows
#[derive(Error, Debug)]
pub enum AppError {
    /// Client-side validation failed; nothing was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A remote call failed; the operation was abandoned
    #[error("{operation} failed: {source}")]
    Remote {
        operation: &'static str,
        #[source]
        source: BackendError,
    },

    /// A multi-step operation failed partway; compensations have run
    #[error("{step} failed (compensated: {compensated}): {source}")]
    PartialFailure {
        step: SagaStep,
        compensated: bool,
        #[source]
        source: BackendError,
    },

    /// Form composition or navigation error
    #[error(transparent)]
    Form(#[from] FormError),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub(crate) fn remote(operation: &'static str, source: BackendError) -> Self {
        AppError::Remote { operation, source }
    }
}

/// Result type for clubhouse_app operations
pub type Result<T> = std::result::Result<T, AppError>;
