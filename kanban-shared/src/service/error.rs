//! Errors raised by board and task operations

use thiserror::Error;

/// Service-level error
///
/// Absence, soft deletion and foreign ownership all surface as
/// [`ServiceError::NotFound`] so callers cannot probe for other users' data.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Entity missing, soft-deleted, or owned by someone else
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A referenced id (assignee, destination column) does not resolve
    #[error("{0}")]
    InvalidReference(String),

    /// The transaction failed and was rolled back; safe to retry
    #[error("Store failure: {0}")]
    Store(#[from] sqlx::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Whether the caller may retry the same request unchanged
    pub fn is_transient(&self) -> bool {
        matches!(self, ServiceError::Store(_))
    }
}
