//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or changing task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is not a canonical `TSK-` identifier.
    #[error("invalid task identifier '{0}', expected TSK-000001 format")]
    InvalidTaskId(String),

    /// A required text field is empty after trimming.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// The query type is not one of SELECT, INSERT, UPDATE or DELETE.
    #[error(transparent)]
    InvalidQueryType(#[from] ParseQueryTypeError),

    /// An update payload tried to change an immutable field.
    #[error("field '{0}' cannot be changed after creation")]
    ImmutableField(String),

    /// An update payload could not be interpreted.
    #[error("invalid update payload: {0}")]
    InvalidUpdatePayload(String),
}

/// Error returned while parsing query types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported query type '{0}', expected SELECT, INSERT, UPDATE or DELETE")]
pub struct ParseQueryTypeError(pub String);
