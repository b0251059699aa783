//! Diesel row models for run persistence.

use super::schema::runs;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Row shape shared by queries and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = runs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RunRow {
    /// Allocated run identifier.
    pub run_task_id: String,
    /// Executed task.
    pub task_id: String,
    /// Target environment tag.
    pub environment: String,
    /// Run status.
    pub status: String,
    /// Outcome summary.
    pub message: String,
    /// Captured rows.
    pub data: Value,
    /// Whether `data` was capped.
    pub truncated: bool,
    /// Affected-row count.
    pub rows_affected: Option<i64>,
    /// Derived rollback statements.
    pub rollback_query: Option<String>,
    /// Live-phase duration.
    pub execution_time_ms: i64,
    /// Task description at execution time.
    pub task_description: String,
    /// Executed SQL text.
    pub sql_query: String,
    /// Requester.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
