//! In-memory run repository for tests and single-process tooling.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::listing::PageRequest;
use crate::run::{
    domain::{Run, RunId},
    ports::{RunRepository, RunRepositoryError, RunRepositoryResult},
};

/// Thread-safe in-memory run repository, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRunRepository {
    runs: Arc<RwLock<Vec<Run>>>,
}

impl InMemoryRunRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every stored run in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`RunRepositoryError::Persistence`] when the lock is poisoned.
    pub fn snapshot(&self) -> RunRepositoryResult<Vec<Run>> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> RunRepositoryResult<std::sync::RwLockReadGuard<'_, Vec<Run>>> {
        self.runs
            .read()
            .map_err(|err| RunRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }
}

fn matches_search(run: &Run, page: &PageRequest) -> bool {
    page.search().is_none_or(|term| {
        let run_id = run.id().to_string();
        let task_id = run.task_id().to_string();
        term.matches_any([
            run_id.as_str(),
            task_id.as_str(),
            run.status().as_str(),
            run.environment().as_str(),
            run.created_by(),
        ])
    })
}

#[async_trait]
impl RunRepository for InMemoryRunRepository {
    async fn store(&self, run: &Run) -> RunRepositoryResult<()> {
        let mut runs = self
            .runs
            .write()
            .map_err(|err| RunRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        if runs.iter().any(|stored| stored.id() == run.id()) {
            return Err(RunRepositoryError::DuplicateRun(run.id()));
        }
        runs.push(run.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: RunId) -> RunRepositoryResult<Option<Run>> {
        Ok(self.read()?.iter().find(|run| run.id() == id).cloned())
    }

    async fn list(&self, page: &PageRequest) -> RunRepositoryResult<Vec<Run>> {
        let runs = self.read()?;
        Ok(page.window(runs.iter().filter(|run| matches_search(run, page)).cloned()))
    }
}
