//! Service layer for creating, changing and listing tasks.

use crate::identifier::services::{IdAllocationError, IdAllocator};
use crate::listing::PageRequest;
use crate::task::{
    domain::{Task, TaskDefinition, TaskDomainError, TaskId, TaskPatch},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Fields a JSON update payload may never carry.
const IMMUTABLE_FIELDS: [&str; 2] = ["task_id", "created_date"];

/// Request payload for registering a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    description: String,
    db_name: String,
    sql_query: String,
    query_type: String,
    created_by: String,
}

impl CreateTaskRequest {
    /// Creates a request with every required field.
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        db_name: impl Into<String>,
        sql_query: impl Into<String>,
        query_type: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            db_name: db_name.into(),
            sql_query: sql_query.into(),
            query_type: query_type.into(),
            created_by: created_by.into(),
        }
    }

    fn into_definition(self) -> Result<TaskDefinition, TaskDomainError> {
        TaskDefinition::new(
            &self.description,
            &self.db_name,
            &self.sql_query,
            &self.query_type,
            &self.created_by,
        )
    }
}

/// Request payload for changing a task's mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    description: Option<String>,
    db_name: Option<String>,
    sql_query: Option<String>,
    query_type: Option<String>,
    created_by: Option<String>,
}

impl UpdateTaskRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    /// Sets the logical database name.
    #[must_use]
    pub fn with_db_name(mut self, value: impl Into<String>) -> Self {
        self.db_name = Some(value.into());
        self
    }

    /// Sets the SQL text.
    #[must_use]
    pub fn with_sql_query(mut self, value: impl Into<String>) -> Self {
        self.sql_query = Some(value.into());
        self
    }

    /// Sets the query type.
    #[must_use]
    pub fn with_query_type(mut self, value: impl Into<String>) -> Self {
        self.query_type = Some(value.into());
        self
    }

    /// Sets the author.
    #[must_use]
    pub fn with_created_by(mut self, value: impl Into<String>) -> Self {
        self.created_by = Some(value.into());
        self
    }

    /// Interprets a JSON object of changed fields.
    ///
    /// `null` values are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ImmutableField`] when the payload names
    /// `task_id` or `created_date`, and
    /// [`TaskDomainError::InvalidUpdatePayload`] when it is not an object,
    /// names an unknown field or carries a non-string value.
    pub fn from_json(payload: &Value) -> Result<Self, TaskDomainError> {
        let Value::Object(fields) = payload else {
            return Err(TaskDomainError::InvalidUpdatePayload(
                "expected a JSON object".to_owned(),
            ));
        };

        let mut request = Self::new();
        for (key, value) in fields {
            if IMMUTABLE_FIELDS.contains(&key.as_str()) {
                return Err(TaskDomainError::ImmutableField(key.clone()));
            }
            let slot = match key.as_str() {
                "task_description" => &mut request.description,
                "db_name" => &mut request.db_name,
                "sql_query" => &mut request.sql_query,
                "query_type" => &mut request.query_type,
                "created_by" => &mut request.created_by,
                other => {
                    return Err(TaskDomainError::InvalidUpdatePayload(format!(
                        "unknown field '{other}'"
                    )));
                }
            };
            match value {
                Value::Null => {}
                Value::String(text) => *slot = Some(text.clone()),
                _ => {
                    return Err(TaskDomainError::InvalidUpdatePayload(format!(
                        "field '{key}' must be a string"
                    )));
                }
            }
        }
        Ok(request)
    }

    fn into_patch(self) -> Result<TaskPatch, TaskDomainError> {
        let mut patch = TaskPatch::new();
        if let Some(value) = self.description {
            patch = patch.with_description(&value)?;
        }
        if let Some(value) = self.db_name {
            patch = patch.with_db_name(&value)?;
        }
        if let Some(value) = self.sql_query {
            patch = patch.with_sql_query(&value)?;
        }
        if let Some(value) = self.query_type {
            patch = patch.with_query_type(&value)?;
        }
        if let Some(value) = self.created_by {
            patch = patch.with_created_by(&value)?;
        }
        Ok(patch)
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// No task exists with the identifier.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Identifier allocation failed.
    #[error(transparent)]
    Allocation(#[from] IdAllocationError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

impl From<TaskRepositoryError> for TaskServiceError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task registry orchestration service.
#[derive(Clone)]
pub struct TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    allocator: IdAllocator,
    clock: Arc<C>,
}

impl<R, C> TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>, allocator: IdAllocator, clock: Arc<C>) -> Self {
        Self {
            repository,
            allocator,
            clock,
        }
    }

    /// Validates and stores a new task under a freshly allocated identifier.
    ///
    /// Validation runs before allocation, so rejected requests never
    /// consume an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] for invalid input,
    /// [`TaskServiceError::Allocation`] when no identifier can be allocated
    /// and [`TaskServiceError::Repository`] when persistence fails.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        let definition = request.into_definition()?;
        let id = self.allocator.allocate_task_id().await?;
        let task = Task::new(id, definition, &*self.clock);
        self.repository.store(&task).await.inspect_err(|err| {
            warn!(task_id = %id, error = %err, "failed to store task");
        })?;
        info!(task_id = %id, db_name = task.db_name(), "created task");
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when no task matches and
    /// [`TaskServiceError::Repository`] when the lookup fails.
    pub async fn get(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::NotFound(id))
    }

    /// Merges the provided fields into an existing task.
    ///
    /// Nothing is written when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] for invalid field values,
    /// [`TaskServiceError::NotFound`] when no task matches and
    /// [`TaskServiceError::Repository`] when persistence fails.
    pub async fn update(&self, id: TaskId, request: UpdateTaskRequest) -> TaskServiceResult<Task> {
        let patch = request.into_patch()?;
        let mut task = self.get(id).await?;
        task.apply(patch, &*self.clock);
        self.repository.update(&task).await?;
        info!(task_id = %id, "updated task");
        Ok(task)
    }

    /// Removes a task.
    ///
    /// Runs recorded against the task are kept.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when no task matches and
    /// [`TaskServiceError::Repository`] when persistence fails.
    pub async fn delete(&self, id: TaskId) -> TaskServiceResult<()> {
        self.repository.delete(id).await?;
        info!(task_id = %id, "deleted task");
        Ok(())
    }

    /// Returns one page of tasks in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the lookup fails.
    pub async fn list(&self, page: &PageRequest) -> TaskServiceResult<Vec<Task>> {
        Ok(self.repository.list(page).await?)
    }
}
