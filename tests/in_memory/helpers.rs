//! Shared wiring for in-memory integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use sqlrun::config::RunSettings;
use sqlrun::environment::{
    adapters::memory::InMemoryEnvironmentConfigRepository, domain::ConnectionParams,
    services::EnvironmentConfigService,
};
use sqlrun::identifier::{adapters::memory::InMemoryCounterStore, services::IdAllocator};
use sqlrun::run::{
    adapters::{memory::InMemoryRunRepository, scripted::ScriptedQueryExecutor},
    services::RunService,
};
use sqlrun::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::Task,
    services::{CreateTaskRequest, TaskService},
};
use std::sync::Arc;

/// Task service over in-memory storage.
pub type Tasks = TaskService<InMemoryTaskRepository, DefaultClock>;

/// Run service over in-memory storage and a scripted executor.
pub type Runner = RunService<
    InMemoryTaskRepository,
    InMemoryEnvironmentConfigRepository,
    InMemoryRunRepository,
    ScriptedQueryExecutor,
    DefaultClock,
>;

/// Every service wired to shared in-memory adapters.
pub struct Stack {
    /// Task registry.
    pub tasks: Tasks,
    /// Connection settings management.
    pub environments: EnvironmentConfigService<InMemoryEnvironmentConfigRepository, DefaultClock>,
    /// Run executor.
    pub runner: Runner,
    /// Run storage shared with `runner`.
    pub runs: Arc<InMemoryRunRepository>,
    /// Executor handle sharing its script with `runner`.
    pub executor: ScriptedQueryExecutor,
}

impl Stack {
    /// Wires a stack around `executor` with the given runner settings.
    pub fn new(executor: ScriptedQueryExecutor, settings: RunSettings) -> Self {
        let clock = Arc::new(DefaultClock);
        let allocator = IdAllocator::new(Arc::new(InMemoryCounterStore::seeded()));
        let task_repository = Arc::new(InMemoryTaskRepository::new());
        let config_repository = Arc::new(InMemoryEnvironmentConfigRepository::new());
        let runs = Arc::new(InMemoryRunRepository::new());
        let runner = RunService::new(
            Arc::clone(&task_repository),
            EnvironmentConfigService::new(Arc::clone(&config_repository), Arc::clone(&clock)),
            Arc::clone(&runs),
            Arc::new(executor.clone()),
            allocator.clone(),
            Arc::clone(&clock),
        )
        .with_settings(settings);
        Self {
            tasks: TaskService::new(task_repository, allocator, Arc::clone(&clock)),
            environments: EnvironmentConfigService::new(config_repository, clock),
            runner,
            runs,
            executor,
        }
    }

    /// Registers a task against the `sales` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the task is rejected.
    pub async fn register_task(&self, sql: &str, query_type: &str) -> eyre::Result<Task> {
        let task = self
            .tasks
            .create(CreateTaskRequest::new(
                "Sales maintenance",
                "sales",
                sql,
                query_type,
                "alice",
            ))
            .await?;
        Ok(task)
    }

    /// Points `environment` of the `sales` database at `host`.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are rejected.
    pub async fn configure(&self, environment: &str, host: &str) -> eyre::Result<()> {
        let connection = ConnectionParams::new(host, 3306, "sales", "svc", "secret")?;
        self.environments
            .upsert("sales", environment, connection)
            .await?;
        Ok(())
    }
}

/// Provides a stack with default settings and an empty script.
#[fixture]
pub fn stack() -> Stack {
    Stack::new(ScriptedQueryExecutor::new(), RunSettings::default())
}
