//! Domain model for environment connection settings.

mod config;
mod environment;
mod error;

pub use config::{ConnectionParams, EnvironmentConfig};
pub use environment::Environment;
pub use error::EnvironmentDomainError;
