//! Error taxonomy for the Golf engine.
//!
//! Every fallible engine operation returns one of these variants. Validation
//! failures and conflicts are client errors; `Internal` covers broken
//! invariants (a stored game missing its creator) and is logged rather than
//! surfaced verbatim.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GolfError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    AlreadyExists(String),
    #[error("{0}")]
    FailedPrecondition(String),
    #[error("{0}")]
    Internal(String),
}

pub type GolfResult<T> = Result<T, GolfError>;

impl GolfError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        GolfError::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        GolfError::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        GolfError::AlreadyExists(msg.into())
    }

    pub fn failed_precondition(msg: impl Into<String>) -> Self {
        GolfError::FailedPrecondition(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        GolfError::Internal(msg.into())
    }

    /// Stable machine-readable code used in the wire error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            GolfError::InvalidArgument(_) => "invalid_argument",
            GolfError::NotFound(_) => "not_found",
            GolfError::AlreadyExists(_) => "already_exists",
            GolfError::FailedPrecondition(_) => "failed_precondition",
            GolfError::Internal(_) => "internal",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            GolfError::InvalidArgument(m)
            | GolfError::NotFound(m)
            | GolfError::AlreadyExists(m)
            | GolfError::FailedPrecondition(m)
            | GolfError::Internal(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_messages() {
        let e = GolfError::failed_precondition("not your turn");
        assert_eq!(e.code(), "failed_precondition");
        assert_eq!(e.message(), "not your turn");
        assert_eq!(e.to_string(), "not your turn");
    }
}
