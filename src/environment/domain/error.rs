//! Validation errors for environment settings.

use thiserror::Error;

/// Errors returned while building environment values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnvironmentDomainError {
    /// The environment tag is blank or contains unsupported characters.
    #[error("invalid environment tag '{0}'")]
    InvalidEnvironment(String),

    /// The configuration key is blank.
    #[error("configuration key must not be empty")]
    EmptyConfigKey,

    /// The host is blank.
    #[error("host must not be empty")]
    EmptyHost,

    /// The port is zero.
    #[error("port must be between 1 and 65535")]
    InvalidPort,

    /// The username is blank.
    #[error("username must not be empty")]
    EmptyUsername,
}
