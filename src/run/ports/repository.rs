//! Repository port for append-only run records.

use crate::listing::PageRequest;
use crate::run::domain::{Run, RunId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for run repository operations.
pub type RunRepositoryResult<T> = Result<T, RunRepositoryError>;

/// Run persistence contract.
///
/// Runs are append-only: there is no update or delete.
#[async_trait]
pub trait RunRepository: Send + Sync {
    /// Stores a new run.
    ///
    /// # Errors
    ///
    /// Returns [`RunRepositoryError::DuplicateRun`] when the run ID already
    /// exists.
    async fn store(&self, run: &Run) -> RunRepositoryResult<()>;

    /// Finds a run by identifier.
    ///
    /// Returns `None` when the run does not exist.
    async fn find_by_id(&self, id: RunId) -> RunRepositoryResult<Option<Run>>;

    /// Returns one page of runs in insertion order.
    ///
    /// The search term, when present, matches the run and task identifiers,
    /// status, environment and requester.
    async fn list(&self, page: &PageRequest) -> RunRepositoryResult<Vec<Run>>;
}

/// Errors returned by run repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RunRepositoryError {
    /// A run with the same identifier already exists.
    #[error("duplicate run identifier: {0}")]
    DuplicateRun(RunId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RunRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
