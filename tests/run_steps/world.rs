//! Shared world state for run execution BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use sqlrun::environment::{
    adapters::memory::InMemoryEnvironmentConfigRepository, services::EnvironmentConfigService,
};
use sqlrun::identifier::{adapters::memory::InMemoryCounterStore, services::IdAllocator};
use sqlrun::run::{
    adapters::{memory::InMemoryRunRepository, scripted::ScriptedQueryExecutor},
    domain::Run,
    services::{RunService, RunServiceError},
};
use sqlrun::task::{adapters::memory::InMemoryTaskRepository, domain::Task, services::TaskService};

/// Run service type used by the BDD world.
pub type TestRunService = RunService<
    InMemoryTaskRepository,
    InMemoryEnvironmentConfigRepository,
    InMemoryRunRepository,
    ScriptedQueryExecutor,
    DefaultClock,
>;

/// Scenario world for run execution behaviour tests.
pub struct RunWorld {
    pub tasks: TaskService<InMemoryTaskRepository, DefaultClock>,
    pub environments: EnvironmentConfigService<InMemoryEnvironmentConfigRepository, DefaultClock>,
    pub runner: TestRunService,
    pub runs: Arc<InMemoryRunRepository>,
    pub executor: ScriptedQueryExecutor,
    pub task: Option<Task>,
    pub last_run_result: Option<Result<Run, RunServiceError>>,
}

impl RunWorld {
    /// Creates a world with empty stores and an empty executor script.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(DefaultClock);
        let allocator = IdAllocator::new(Arc::new(InMemoryCounterStore::seeded()));
        let task_repository = Arc::new(InMemoryTaskRepository::new());
        let config_repository = Arc::new(InMemoryEnvironmentConfigRepository::new());
        let runs = Arc::new(InMemoryRunRepository::new());
        let executor = ScriptedQueryExecutor::new();
        let runner = RunService::new(
            Arc::clone(&task_repository),
            EnvironmentConfigService::new(Arc::clone(&config_repository), Arc::clone(&clock)),
            Arc::clone(&runs),
            Arc::new(executor.clone()),
            allocator.clone(),
            Arc::clone(&clock),
        );
        Self {
            tasks: TaskService::new(task_repository, allocator, Arc::clone(&clock)),
            environments: EnvironmentConfigService::new(config_repository, clock),
            runner,
            runs,
            executor,
            task: None,
            last_run_result: None,
        }
    }
}

impl Default for RunWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RunWorld {
    RunWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
