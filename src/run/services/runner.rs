//! Run orchestration: task lookup, connection resolution, live execution
//! and recording.

use crate::config::RunSettings;
use crate::environment::{
    domain::{ConnectionParams, Environment},
    ports::EnvironmentConfigRepository,
    services::{EnvironmentConfigError, EnvironmentConfigService},
};
use crate::identifier::services::{IdAllocationError, IdAllocator};
use crate::listing::PageRequest;
use crate::run::{
    domain::{QueryOutcome, RollbackPlan, RowMap, Run, RunDomainError, RunId, RunRecord, RunStatus},
    ports::{
        ExecutionPlan, ExecutionReport, PreImageQuery, QueryExecutionError, QueryExecutor,
        RunRepository, RunRepositoryError,
    },
};
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Request payload for executing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteRunRequest {
    task_id: TaskId,
    environment: Environment,
    requested_by: String,
}

impl ExecuteRunRequest {
    /// Creates a request to run `task_id` against `environment`.
    #[must_use]
    pub fn new(task_id: TaskId, environment: Environment, requested_by: impl Into<String>) -> Self {
        Self {
            task_id,
            environment,
            requested_by: requested_by.into(),
        }
    }

    /// Returns the task to execute.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the target environment.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Returns the requester.
    #[must_use]
    pub fn requested_by(&self) -> &str {
        &self.requested_by
    }
}

/// Service-level errors for run operations.
///
/// Failures of the live phase itself (connection, statement, timeout) are
/// not errors: they are recorded as failed runs.
#[derive(Debug, Error)]
pub enum RunServiceError {
    /// Request validation failed.
    #[error(transparent)]
    Domain(#[from] RunDomainError),

    /// The task to execute does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// No connection settings exist for the task's database and the
    /// requested environment.
    #[error("no connection configuration for '{config_key}' in environment {environment}")]
    ConfigurationNotFound {
        /// Logical database name of the task.
        config_key: String,
        /// Requested environment.
        environment: Environment,
    },

    /// No run exists with the identifier.
    #[error("run not found: {0}")]
    NotFound(RunId),

    /// Task lookup failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// Connection settings lookup failed.
    #[error(transparent)]
    Environment(EnvironmentConfigError),

    /// Run persistence failed.
    #[error(transparent)]
    Runs(#[from] RunRepositoryError),

    /// Run identifier allocation failed.
    #[error(transparent)]
    Allocation(#[from] IdAllocationError),

    /// The detached live phase panicked.
    #[error("run execution task failed: {0}")]
    LivePhase(#[from] tokio::task::JoinError),
}

impl From<EnvironmentConfigError> for RunServiceError {
    fn from(err: EnvironmentConfigError) -> Self {
        match err {
            EnvironmentConfigError::ConfigurationNotFound {
                config_key,
                environment,
            } => Self::ConfigurationNotFound {
                config_key,
                environment,
            },
            other => Self::Environment(other),
        }
    }
}

/// Result type for run service operations.
pub type RunServiceResult<T> = Result<T, RunServiceError>;

/// Executes stored tasks and records their runs.
#[derive(Clone)]
pub struct RunService<T, E, R, X, C>
where
    T: TaskRepository,
    E: EnvironmentConfigRepository,
    R: RunRepository,
    X: QueryExecutor,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    environments: EnvironmentConfigService<E, C>,
    runs: Arc<R>,
    executor: Arc<X>,
    allocator: IdAllocator,
    clock: Arc<C>,
    settings: RunSettings,
}

impl<T, E, R, X, C> RunService<T, E, R, X, C>
where
    T: TaskRepository,
    E: EnvironmentConfigRepository,
    R: RunRepository + 'static,
    X: QueryExecutor + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a run service with default [`RunSettings`].
    #[must_use]
    pub fn new(
        tasks: Arc<T>,
        environments: EnvironmentConfigService<E, C>,
        runs: Arc<R>,
        executor: Arc<X>,
        allocator: IdAllocator,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            environments,
            runs,
            executor,
            allocator,
            clock,
            settings: RunSettings::default(),
        }
    }

    /// Replaces the runner settings.
    #[must_use]
    pub const fn with_settings(mut self, settings: RunSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the active runner settings.
    #[must_use]
    pub const fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Executes a task against an environment and records the run.
    ///
    /// The task and connection settings are resolved first; a miss on
    /// either returns an error without connecting or recording anything.
    /// The live phase then runs on a detached task: if the caller stops
    /// waiting, the statement still completes and its run is still
    /// recorded. Connection, statement and timeout failures produce a run
    /// with [`RunStatus::Failure`].
    ///
    /// # Errors
    ///
    /// Returns [`RunServiceError::Domain`] for a blank requester,
    /// [`RunServiceError::TaskNotFound`],
    /// [`RunServiceError::ConfigurationNotFound`], or a storage, allocation
    /// or join error.
    pub async fn execute(&self, request: ExecuteRunRequest) -> RunServiceResult<Run> {
        let ExecuteRunRequest {
            task_id,
            environment,
            requested_by,
        } = request;
        let requester = requested_by.trim();
        if requester.is_empty() {
            return Err(RunDomainError::EmptyRequestedBy.into());
        }

        let task = self.tasks.find_by_id(task_id).await?.ok_or_else(|| {
            warn!(%task_id, "run requested for unknown task");
            RunServiceError::TaskNotFound(task_id)
        })?;
        let connection = self
            .environments
            .resolve(task.db_name(), &environment)
            .await?;

        let rollback = RollbackPlan::for_statement(task.query_type(), task.sql_query());
        let plan = self.plan_for(&task, &rollback);
        info!(
            %task_id,
            environment = %environment,
            target = %connection.target(),
            pre_image = plan.pre_image().is_some(),
            "starting run"
        );

        let live = LivePhase {
            runs: Arc::clone(&self.runs),
            executor: Arc::clone(&self.executor),
            allocator: self.allocator.clone(),
            clock: Arc::clone(&self.clock),
            settings: self.settings,
            connection,
            plan,
            rollback,
            task,
            environment,
            requested_by: requester.to_owned(),
        };
        tokio::spawn(live.run()).await?
    }

    /// Retrieves a run by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RunServiceError::NotFound`] when no run matches and
    /// [`RunServiceError::Runs`] when the lookup fails.
    pub async fn get(&self, id: RunId) -> RunServiceResult<Run> {
        self.runs
            .find_by_id(id)
            .await?
            .ok_or(RunServiceError::NotFound(id))
    }

    /// Returns one page of runs in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`RunServiceError::Runs`] when the lookup fails.
    pub async fn list(&self, page: &PageRequest) -> RunServiceResult<Vec<Run>> {
        Ok(self.runs.list(page).await?)
    }

    fn plan_for(&self, task: &Task, rollback: &RollbackPlan) -> ExecutionPlan {
        let plan = ExecutionPlan::new(task.sql_query(), self.settings.row_limit());
        let Some(pre_image) = rollback.pre_image() else {
            return plan;
        };
        let limit = self.settings.pre_image_row_limit();
        plan.with_pre_image(PreImageQuery::new(pre_image.capture_sql(limit), limit))
    }
}

/// Everything the detached part of a run owns.
struct LivePhase<R, X, C> {
    runs: Arc<R>,
    executor: Arc<X>,
    allocator: IdAllocator,
    clock: Arc<C>,
    settings: RunSettings,
    connection: ConnectionParams,
    plan: ExecutionPlan,
    rollback: RollbackPlan,
    task: Task,
    environment: Environment,
    requested_by: String,
}

/// Status, message and captured data of a finished live phase.
struct Shaped {
    status: RunStatus,
    message: String,
    data: Vec<RowMap>,
    truncated: bool,
    rows_affected: Option<u64>,
    rollback_query: Option<String>,
}

impl Shaped {
    const fn failure(message: String) -> Self {
        Self {
            status: RunStatus::Failure,
            message,
            data: Vec::new(),
            truncated: false,
            rows_affected: None,
            rollback_query: None,
        }
    }
}

impl<R, X, C> LivePhase<R, X, C>
where
    R: RunRepository,
    X: QueryExecutor,
    C: Clock + Send + Sync,
{
    async fn run(self) -> RunServiceResult<Run> {
        let timeout = self.settings.query_timeout();
        let started = Instant::now();
        let result = tokio::time::timeout(
            timeout,
            self.executor.execute(&self.connection, &self.plan),
        )
        .await;
        let execution_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let shaped = match result {
            Ok(Ok(report)) => self.shape_success(report),
            Ok(Err(err)) => self.shape_failure(&err),
            Err(_) => {
                warn!(task_id = %self.task.id(), ?timeout, "run timed out");
                Shaped::failure(format!(
                    "Execution failed: query did not complete within {timeout:?}"
                ))
            }
        };

        let run_id = self.allocator.allocate_run_id().await.inspect_err(|err| {
            error!(task_id = %self.task.id(), error = %err, "could not allocate run identifier");
        })?;
        let record = RunRecord {
            task_id: self.task.id(),
            environment: self.environment,
            status: shaped.status,
            message: shaped.message,
            data: shaped.data,
            truncated: shaped.truncated,
            rows_affected: shaped.rows_affected,
            rollback_query: shaped.rollback_query,
            execution_time_ms,
            task_description: self.task.description().to_owned(),
            sql_query: self.task.sql_query().to_owned(),
            created_by: self.requested_by,
        };
        let run = Run::new(run_id, record, &*self.clock);
        self.runs.store(&run).await.inspect_err(|err| {
            error!(%run_id, error = %err, "could not store run");
        })?;
        info!(
            %run_id,
            task_id = %run.task_id(),
            status = %run.status(),
            execution_time_ms,
            "recorded run"
        );
        Ok(run)
    }

    fn shape_success(&self, report: ExecutionReport) -> Shaped {
        let (outcome, pre_image) = report.into_parts();
        let capped = outcome.capped(self.settings.row_limit());
        let rows_affected = capped.rows_affected();
        let truncated = capped.truncated();
        let rows = capped.into_rows();

        let message = if rows.is_empty() {
            format!("Query executed successfully. Rows affected: {rows_affected}")
        } else if truncated {
            format!(
                "Query executed successfully. Rows returned: {} (truncated)",
                rows.len()
            )
        } else {
            format!("Query executed successfully. Rows returned: {}", rows.len())
        };

        Shaped {
            status: RunStatus::Success,
            message,
            data: rows,
            truncated,
            rows_affected: Some(rows_affected),
            rollback_query: self.rollback_query(pre_image),
        }
    }

    fn shape_failure(&self, err: &QueryExecutionError) -> Shaped {
        warn!(task_id = %self.task.id(), error = %err, "run failed");
        Shaped::failure(format!("Execution failed: {err}"))
    }

    fn rollback_query(
        &self,
        pre_image: Option<Result<QueryOutcome, QueryExecutionError>>,
    ) -> Option<String> {
        match &self.rollback {
            RollbackPlan::Unsupported => None,
            RollbackPlan::Ready(sql) => Some(sql.clone()),
            RollbackPlan::PreImage(plan) => match pre_image {
                Some(Ok(captured)) if !captured.truncated() => plan.render(captured.rows()),
                Some(Ok(_)) => {
                    debug!(task_id = %self.task.id(), "pre-image exceeded its row limit");
                    None
                }
                Some(Err(_)) | None => None,
            },
        }
    }
}
