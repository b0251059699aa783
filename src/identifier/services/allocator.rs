//! Allocation of sequence identifiers from the shared counters.

use crate::identifier::{
    domain::{CounterType, SequenceId},
    ports::{CounterStore, CounterStoreError},
};
use crate::run::domain::RunId;
use crate::task::domain::TaskId;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// Errors returned while allocating identifiers.
#[derive(Debug, Clone, Error)]
pub enum IdAllocationError {
    /// The counter for the category was never seeded.
    ///
    /// This is a deployment fault: defaulting to zero would reissue
    /// identifiers that already exist.
    #[error("missing configuration: counter {0} has not been seeded")]
    ConfigurationMissing(CounterType),

    /// The counter store failed.
    #[error("failed to allocate {counter_type} identifier: {source}")]
    Store {
        /// Counter category being allocated.
        counter_type: CounterType,
        /// Underlying store error.
        #[source]
        source: CounterStoreError,
    },
}

/// Result type for identifier allocation.
pub type IdAllocationResult<T> = Result<T, IdAllocationError>;

/// Formats counter values into sequence identifiers.
///
/// The allocator is a cheap handle around a shared store; clones share the
/// same counters.
#[derive(Clone)]
pub struct IdAllocator {
    store: Arc<dyn CounterStore>,
}

impl IdAllocator {
    /// Creates an allocator backed by `store`.
    #[must_use]
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Allocates the next identifier for `counter_type`.
    ///
    /// The counter increment is committed before this returns and is never
    /// rolled back, even if the caller fails to persist its record.
    ///
    /// # Errors
    ///
    /// Returns [`IdAllocationError::ConfigurationMissing`] when the counter
    /// has not been seeded and [`IdAllocationError::Store`] for any other
    /// store failure.
    pub async fn allocate(&self, counter_type: CounterType) -> IdAllocationResult<SequenceId> {
        let value = self
            .store
            .increment(counter_type)
            .await
            .map_err(|err| match err {
                CounterStoreError::NotSeeded(kind) => {
                    error!(counter_type = %kind, "counter has not been seeded");
                    IdAllocationError::ConfigurationMissing(kind)
                }
                other => {
                    error!(counter_type = %counter_type, error = %other, "counter increment failed");
                    IdAllocationError::Store {
                        counter_type,
                        source: other,
                    }
                }
            })?;

        let id = SequenceId::new(counter_type, value).map_err(|_| IdAllocationError::Store {
            counter_type,
            source: CounterStoreError::persistence(std::io::Error::other(
                "counter store returned zero after increment",
            )),
        })?;
        debug!(%id, "allocated identifier");
        Ok(id)
    }

    /// Allocates the next task identifier.
    ///
    /// # Errors
    ///
    /// See [`IdAllocator::allocate`].
    pub async fn allocate_task_id(&self) -> IdAllocationResult<TaskId> {
        self.allocate(CounterType::Task)
            .await
            .map(TaskId::from_allocated)
    }

    /// Allocates the next run identifier.
    ///
    /// # Errors
    ///
    /// See [`IdAllocator::allocate`].
    pub async fn allocate_run_id(&self) -> IdAllocationResult<RunId> {
        self.allocate(CounterType::Run).await.map(RunId::from_allocated)
    }

    /// Seeds every counter category that does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`IdAllocationError::Store`] when seeding fails.
    pub async fn seed_all(&self) -> IdAllocationResult<()> {
        for counter_type in CounterType::ALL {
            self.store
                .seed(counter_type)
                .await
                .map_err(|source| IdAllocationError::Store {
                    counter_type,
                    source,
                })?;
        }
        Ok(())
    }
}
