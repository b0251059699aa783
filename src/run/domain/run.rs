//! Append-only record of one task execution.

use super::{RowMap, RunId, RunStatus};
use crate::environment::domain::Environment;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Everything a run records apart from its identifier and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    /// Task that was executed.
    pub task_id: TaskId,
    /// Environment the task ran against.
    pub environment: Environment,
    /// Whether the live phase completed.
    pub status: RunStatus,
    /// Human-readable summary of the outcome.
    pub message: String,
    /// Result rows, capped by the configured row limit.
    pub data: Vec<RowMap>,
    /// Whether `data` was capped.
    pub truncated: bool,
    /// Affected-row count for successful statements.
    pub rows_affected: Option<u64>,
    /// Statements that undo the change, when one could be derived.
    pub rollback_query: Option<String>,
    /// Wall-clock duration of the live phase.
    pub execution_time_ms: u64,
    /// Task description at execution time.
    pub task_description: String,
    /// SQL text that was executed.
    pub sql_query: String,
    /// Person or system that requested the run.
    pub created_by: String,
}

/// A recorded run. Runs are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    #[serde(rename = "run_task_id")]
    id: RunId,
    task_id: TaskId,
    environment: Environment,
    status: RunStatus,
    message: String,
    data: Vec<RowMap>,
    truncated: bool,
    rows_affected: Option<u64>,
    rollback_query: Option<String>,
    execution_time_ms: u64,
    task_description: String,
    sql_query: String,
    created_by: String,
    #[serde(rename = "created_date")]
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted run.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedRunData {
    /// Persisted run identifier.
    pub id: RunId,
    /// Persisted run content.
    pub record: RunRecord,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Run {
    /// Creates a run from an allocated identifier, stamped with the current
    /// time.
    #[must_use]
    pub fn new(id: RunId, record: RunRecord, clock: &impl Clock) -> Self {
        Self::from_persisted(PersistedRunData {
            id,
            record,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a run from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedRunData) -> Self {
        let PersistedRunData {
            id,
            record,
            created_at,
        } = data;
        Self {
            id,
            task_id: record.task_id,
            environment: record.environment,
            status: record.status,
            message: record.message,
            data: record.data,
            truncated: record.truncated,
            rows_affected: record.rows_affected,
            rollback_query: record.rollback_query,
            execution_time_ms: record.execution_time_ms,
            task_description: record.task_description,
            sql_query: record.sql_query,
            created_by: record.created_by,
            created_at,
        }
    }

    /// Returns the run identifier.
    #[must_use]
    pub const fn id(&self) -> RunId {
        self.id
    }

    /// Returns the executed task's identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the environment the task ran against.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Returns the run status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Returns the outcome summary.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the captured rows.
    #[must_use]
    pub fn data(&self) -> &[RowMap] {
        &self.data
    }

    /// Returns whether the captured rows were capped.
    #[must_use]
    pub const fn truncated(&self) -> bool {
        self.truncated
    }

    /// Returns the affected-row count, if the statement succeeded.
    #[must_use]
    pub const fn rows_affected(&self) -> Option<u64> {
        self.rows_affected
    }

    /// Returns the derived rollback statements, if any.
    #[must_use]
    pub fn rollback_query(&self) -> Option<&str> {
        self.rollback_query.as_deref()
    }

    /// Returns the live-phase duration in milliseconds.
    #[must_use]
    pub const fn execution_time_ms(&self) -> u64 {
        self.execution_time_ms
    }

    /// Returns the task description captured at execution time.
    #[must_use]
    pub fn task_description(&self) -> &str {
        &self.task_description
    }

    /// Returns the SQL text that was executed.
    #[must_use]
    pub fn sql_query(&self) -> &str {
        &self.sql_query
    }

    /// Returns the requester.
    #[must_use]
    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
