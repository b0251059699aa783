//! Diesel row models for environment configuration storage.

use super::schema::environment_configs;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row shape shared by queries and upserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = environment_configs)]
#[diesel(primary_key(config_key, environment))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EnvironmentConfigRow {
    /// Logical database name.
    pub config_key: String,
    /// Normalized environment tag.
    pub environment: String,
    /// Target host.
    pub host: String,
    /// Target port.
    pub port: i32,
    /// Default database.
    pub database_name: String,
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Last write timestamp.
    pub updated_at: DateTime<Utc>,
}
