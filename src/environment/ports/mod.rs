//! Port contracts for environment configuration storage.

pub mod repository;

pub use repository::{
    EnvironmentConfigRepository, EnvironmentConfigRepositoryError,
    EnvironmentConfigRepositoryResult,
};
