//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Allocated task identifier.
    pub task_id: String,
    /// Description.
    pub task_description: String,
    /// Logical database name.
    pub db_name: String,
    /// SQL text.
    pub sql_query: String,
    /// Declared statement kind.
    pub query_type: String,
    /// Author.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Allocated task identifier.
    pub task_id: String,
    /// Description.
    pub task_description: String,
    /// Logical database name.
    pub db_name: String,
    /// SQL text.
    pub sql_query: String,
    /// Declared statement kind.
    pub query_type: String,
    /// Author.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Changeset for the mutable task columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Description.
    pub task_description: String,
    /// Logical database name.
    pub db_name: String,
    /// SQL text.
    pub sql_query: String,
    /// Declared statement kind.
    pub query_type: String,
    /// Author.
    pub created_by: String,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}
