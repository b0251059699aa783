//! Counter store port: the single atomic primitive behind identifiers.

use crate::identifier::domain::CounterType;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for counter store operations.
pub type CounterStoreResult<T> = Result<T, CounterStoreError>;

/// Shared counter persistence contract.
///
/// Implementations must make [`CounterStore::increment`] indivisible across
/// every process sharing the store: two concurrent callers never observe
/// the same post-increment value.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Creates the counter with value 0 unless it already exists.
    ///
    /// Seeding an existing counter leaves its value untouched.
    async fn seed(&self, counter_type: CounterType) -> CounterStoreResult<()>;

    /// Atomically increments the counter by one and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`CounterStoreError::NotSeeded`] when no counter exists for
    /// `counter_type`. The store never creates the counter implicitly.
    async fn increment(&self, counter_type: CounterType) -> CounterStoreResult<u64>;

    /// Reads the current value without changing it.
    ///
    /// Returns `None` when the counter has not been seeded.
    async fn current(&self, counter_type: CounterType) -> CounterStoreResult<Option<u64>>;
}

/// Errors returned by counter store implementations.
#[derive(Debug, Clone, Error)]
pub enum CounterStoreError {
    /// No counter row exists for the category.
    #[error("counter {0} has not been seeded")]
    NotSeeded(CounterType),

    /// The counter reached the largest persistable value.
    #[error("counter {0} is exhausted")]
    Overflow(CounterType),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CounterStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
