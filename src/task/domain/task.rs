//! Task record and the value objects used to create and change it.

use super::{QueryType, TaskDomainError, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated content of a task, without identity or timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    description: String,
    db_name: String,
    sql_query: String,
    query_type: QueryType,
    created_by: String,
}

impl TaskDefinition {
    /// Validates and builds a task definition.
    ///
    /// Text fields are trimmed; the SQL text is kept verbatim apart from
    /// surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyField`] when a text field is blank and
    /// [`TaskDomainError::InvalidQueryType`] for an unknown query type.
    pub fn new(
        description: &str,
        db_name: &str,
        sql_query: &str,
        query_type: &str,
        created_by: &str,
    ) -> Result<Self, TaskDomainError> {
        Ok(Self {
            description: required("task_description", description)?,
            db_name: required("db_name", db_name)?,
            sql_query: required("sql_query", sql_query)?,
            query_type: QueryType::try_from(query_type)?,
            created_by: required("created_by", created_by)?,
        })
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the logical database name.
    #[must_use]
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    /// Returns the SQL text.
    #[must_use]
    pub fn sql_query(&self) -> &str {
        &self.sql_query
    }

    /// Returns the declared query type.
    #[must_use]
    pub const fn query_type(&self) -> QueryType {
        self.query_type
    }

    /// Returns the author.
    #[must_use]
    pub fn created_by(&self) -> &str {
        &self.created_by
    }
}

/// Partial change to a task's mutable fields.
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    description: Option<String>,
    db_name: Option<String>,
    sql_query: Option<String>,
    query_type: Option<QueryType>,
    created_by: Option<String>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyField`] when `value` is blank.
    pub fn with_description(mut self, value: &str) -> Result<Self, TaskDomainError> {
        self.description = Some(required("task_description", value)?);
        Ok(self)
    }

    /// Replaces the logical database name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyField`] when `value` is blank.
    pub fn with_db_name(mut self, value: &str) -> Result<Self, TaskDomainError> {
        self.db_name = Some(required("db_name", value)?);
        Ok(self)
    }

    /// Replaces the SQL text.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyField`] when `value` is blank.
    pub fn with_sql_query(mut self, value: &str) -> Result<Self, TaskDomainError> {
        self.sql_query = Some(required("sql_query", value)?);
        Ok(self)
    }

    /// Replaces the declared query type.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidQueryType`] for an unknown type.
    pub fn with_query_type(mut self, value: &str) -> Result<Self, TaskDomainError> {
        self.query_type = Some(QueryType::try_from(value)?);
        Ok(self)
    }

    /// Replaces the author.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyField`] when `value` is blank.
    pub fn with_created_by(mut self, value: &str) -> Result<Self, TaskDomainError> {
        self.created_by = Some(required("created_by", value)?);
        Ok(self)
    }

    /// Returns whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.db_name.is_none()
            && self.sql_query.is_none()
            && self.query_type.is_none()
            && self.created_by.is_none()
    }
}

/// A stored SQL task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "task_id")]
    id: TaskId,
    #[serde(rename = "task_description")]
    description: String,
    db_name: String,
    sql_query: String,
    query_type: QueryType,
    created_by: String,
    #[serde(rename = "created_date")]
    created_at: DateTime<Utc>,
    #[serde(rename = "updated_date")]
    updated_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted description.
    pub description: String,
    /// Persisted logical database name.
    pub db_name: String,
    /// Persisted SQL text.
    pub sql_query: String,
    /// Persisted query type.
    pub query_type: QueryType,
    /// Persisted author.
    pub created_by: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last update timestamp, if the task was ever updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a task from an allocated identifier and a validated
    /// definition.
    #[must_use]
    pub fn new(id: TaskId, definition: TaskDefinition, clock: &impl Clock) -> Self {
        let TaskDefinition {
            description,
            db_name,
            sql_query,
            query_type,
            created_by,
        } = definition;
        Self {
            id,
            description,
            db_name,
            sql_query,
            query_type,
            created_by,
            created_at: clock.utc(),
            updated_at: None,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            description: data.description,
            db_name: data.db_name,
            sql_query: data.sql_query,
            query_type: data.query_type,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the logical database name used to resolve connections.
    #[must_use]
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    /// Returns the SQL text.
    #[must_use]
    pub fn sql_query(&self) -> &str {
        &self.sql_query
    }

    /// Returns the declared query type.
    #[must_use]
    pub const fn query_type(&self) -> QueryType {
        self.query_type
    }

    /// Returns the author.
    #[must_use]
    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp, if any.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Merges `patch` into the task and stamps the update time.
    pub fn apply(&mut self, patch: TaskPatch, clock: &impl Clock) {
        let TaskPatch {
            description,
            db_name,
            sql_query,
            query_type,
            created_by,
        } = patch;
        if let Some(value) = description {
            self.description = value;
        }
        if let Some(value) = db_name {
            self.db_name = value;
        }
        if let Some(value) = sql_query {
            self.sql_query = value;
        }
        if let Some(value) = query_type {
            self.query_type = value;
        }
        if let Some(value) = created_by {
            self.created_by = value;
        }
        self.updated_at = Some(clock.utc());
    }
}

fn required(field: &'static str, value: &str) -> Result<String, TaskDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyField(field));
    }
    Ok(trimmed.to_owned())
}
