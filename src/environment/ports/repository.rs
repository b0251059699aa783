//! Repository port for environment configuration entries.

use crate::environment::domain::{Environment, EnvironmentConfig};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for environment configuration repository operations.
pub type EnvironmentConfigRepositoryResult<T> = Result<T, EnvironmentConfigRepositoryError>;

/// Environment configuration persistence contract.
///
/// Entries are unique per `(config_key, environment)` pair.
#[async_trait]
pub trait EnvironmentConfigRepository: Send + Sync {
    /// Finds the entry for an exact key and environment pair.
    async fn find(
        &self,
        config_key: &str,
        environment: &Environment,
    ) -> EnvironmentConfigRepositoryResult<Option<EnvironmentConfig>>;

    /// Inserts the entry or replaces the one with the same pair.
    async fn upsert(&self, config: &EnvironmentConfig) -> EnvironmentConfigRepositoryResult<()>;

    /// Removes the entry for a pair.
    ///
    /// Returns `false` when no entry existed.
    async fn remove(
        &self,
        config_key: &str,
        environment: &Environment,
    ) -> EnvironmentConfigRepositoryResult<bool>;

    /// Returns every entry for `config_key`, ordered by environment.
    async fn list_for_key(
        &self,
        config_key: &str,
    ) -> EnvironmentConfigRepositoryResult<Vec<EnvironmentConfig>>;
}

/// Errors returned by environment configuration repositories.
#[derive(Debug, Clone, Error)]
pub enum EnvironmentConfigRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl EnvironmentConfigRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
