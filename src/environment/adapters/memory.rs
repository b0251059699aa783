//! In-memory environment configuration repository.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::environment::{
    domain::{Environment, EnvironmentConfig},
    ports::{
        EnvironmentConfigRepository, EnvironmentConfigRepositoryError,
        EnvironmentConfigRepositoryResult,
    },
};

type ConfigKey = (String, Environment);

/// Thread-safe in-memory environment configuration repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEnvironmentConfigRepository {
    entries: Arc<RwLock<BTreeMap<ConfigKey, EnvironmentConfig>>>,
}

impl InMemoryEnvironmentConfigRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned(err: impl std::fmt::Display) -> EnvironmentConfigRepositoryError {
        EnvironmentConfigRepositoryError::persistence(std::io::Error::other(err.to_string()))
    }
}

#[async_trait]
impl EnvironmentConfigRepository for InMemoryEnvironmentConfigRepository {
    async fn find(
        &self,
        config_key: &str,
        environment: &Environment,
    ) -> EnvironmentConfigRepositoryResult<Option<EnvironmentConfig>> {
        let entries = self.entries.read().map_err(Self::poisoned)?;
        Ok(entries
            .get(&(config_key.to_owned(), environment.clone()))
            .cloned())
    }

    async fn upsert(&self, config: &EnvironmentConfig) -> EnvironmentConfigRepositoryResult<()> {
        let mut entries = self.entries.write().map_err(Self::poisoned)?;
        entries.insert(
            (config.config_key().to_owned(), config.environment().clone()),
            config.clone(),
        );
        Ok(())
    }

    async fn remove(
        &self,
        config_key: &str,
        environment: &Environment,
    ) -> EnvironmentConfigRepositoryResult<bool> {
        let mut entries = self.entries.write().map_err(Self::poisoned)?;
        Ok(entries
            .remove(&(config_key.to_owned(), environment.clone()))
            .is_some())
    }

    async fn list_for_key(
        &self,
        config_key: &str,
    ) -> EnvironmentConfigRepositoryResult<Vec<EnvironmentConfig>> {
        let entries = self.entries.read().map_err(Self::poisoned)?;
        Ok(entries
            .values()
            .filter(|entry| entry.config_key() == config_key)
            .cloned()
            .collect())
    }
}
