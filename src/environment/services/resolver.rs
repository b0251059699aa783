//! Resolution and administration of environment connection settings.

use crate::environment::{
    domain::{ConnectionParams, Environment, EnvironmentConfig, EnvironmentDomainError},
    ports::{EnvironmentConfigRepository, EnvironmentConfigRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Service-level errors for environment configuration.
#[derive(Debug, Error)]
pub enum EnvironmentConfigError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] EnvironmentDomainError),

    /// No entry exists for the pair.
    #[error("no connection configuration for '{config_key}' in environment {environment}")]
    ConfigurationNotFound {
        /// Logical database name that was looked up.
        config_key: String,
        /// Environment that was looked up.
        environment: Environment,
    },

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] EnvironmentConfigRepositoryError),
}

/// Result type for environment configuration operations.
pub type EnvironmentConfigResult<T> = Result<T, EnvironmentConfigError>;

/// Resolves connection parameters and manages configuration entries.
///
/// Lookups are not cached: every call reads the repository, so
/// administrative changes apply to the next run.
#[derive(Clone)]
pub struct EnvironmentConfigService<R, C>
where
    R: EnvironmentConfigRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> EnvironmentConfigService<R, C>
where
    R: EnvironmentConfigRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new environment configuration service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns the connection parameters for an exact key and environment.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentConfigError::ConfigurationNotFound`] when no
    /// entry matches and [`EnvironmentConfigError::Repository`] when the
    /// lookup fails.
    pub async fn resolve(
        &self,
        config_key: &str,
        environment: &Environment,
    ) -> EnvironmentConfigResult<ConnectionParams> {
        let entry = self.repository.find(config_key, environment).await?;
        let Some(config) = entry else {
            warn!(config_key, environment = %environment, "connection configuration missing");
            return Err(EnvironmentConfigError::ConfigurationNotFound {
                config_key: config_key.to_owned(),
                environment: environment.clone(),
            });
        };
        debug!(
            config_key,
            environment = %environment,
            target = %config.connection().target(),
            "resolved connection configuration"
        );
        Ok(config.connection().clone())
    }

    /// Registers or replaces the entry for a key and environment.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentConfigError::Domain`] for an invalid key or tag
    /// and [`EnvironmentConfigError::Repository`] when persistence fails.
    pub async fn upsert(
        &self,
        config_key: &str,
        environment: &str,
        connection: ConnectionParams,
    ) -> EnvironmentConfigResult<EnvironmentConfig> {
        let tag = Environment::new(environment)?;
        let config = EnvironmentConfig::new(config_key, tag, connection, &*self.clock)?;
        self.repository.upsert(&config).await?;
        info!(
            config_key = config.config_key(),
            environment = %config.environment(),
            "stored connection configuration"
        );
        Ok(config)
    }

    /// Removes the entry for a key and environment.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentConfigError::ConfigurationNotFound`] when no
    /// entry matches and [`EnvironmentConfigError::Repository`] when
    /// persistence fails.
    pub async fn remove(
        &self,
        config_key: &str,
        environment: &Environment,
    ) -> EnvironmentConfigResult<()> {
        if !self.repository.remove(config_key, environment).await? {
            return Err(EnvironmentConfigError::ConfigurationNotFound {
                config_key: config_key.to_owned(),
                environment: environment.clone(),
            });
        }
        info!(config_key, environment = %environment, "removed connection configuration");
        Ok(())
    }

    /// Returns every entry registered for a logical database.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentConfigError::Repository`] when the lookup fails.
    pub async fn list_for_key(
        &self,
        config_key: &str,
    ) -> EnvironmentConfigResult<Vec<EnvironmentConfig>> {
        Ok(self.repository.list_for_key(config_key).await?)
    }
}
