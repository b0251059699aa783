//! Error types for run domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing run values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunDomainError {
    /// The run identifier is not a canonical `RUN-` identifier.
    #[error("invalid run identifier '{0}', expected RUN-000001 format")]
    InvalidRunId(String),

    /// The requester name is blank.
    #[error("requested_by must not be empty")]
    EmptyRequestedBy,

    /// The stored status is not `success` or `failure`.
    #[error("unknown run status '{0}'")]
    InvalidStatus(String),
}
