//! Shared test helpers for `PostgreSQL` integration tests.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use mockable::DefaultClock;
use sqlrun::identifier::domain::{CounterType, SequenceId};
use sqlrun::postgres::{PgPool, connect_pool, run_migrations};
use sqlrun::task::domain::{Task, TaskDefinition, TaskId};
use std::env;
use uuid::Uuid;

/// Environment variable holding the administrative connection URL.
pub const TEST_DATABASE_URL_ENV: &str = "SQLRUN_TEST_DATABASE_URL";

/// A migrated database dropped when the guard goes out of scope.
pub struct TemporaryDatabase {
    admin_url: String,
    name: String,
    pool: PgPool,
}

impl TemporaryDatabase {
    /// Returns a pool connected to the temporary database.
    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        let statement = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", self.name);
        let dropped = PgConnection::establish(&self.admin_url)
            .map_err(|err| err.to_string())
            .and_then(|mut conn| conn.batch_execute(&statement).map_err(|err| err.to_string()));
        if let Err(err) = dropped {
            tracing::warn!(database = %self.name, error = %err, "failed to drop test database");
        }
    }
}

/// Replaces the database name in a `postgres://` URL.
pub fn database_url(admin_url: &str, database: &str) -> String {
    let (base, query) = admin_url
        .split_once('?')
        .map_or((admin_url, None), |(base, query)| (base, Some(query)));
    let server = base.rsplit_once('/').map_or(base, |(server, _)| server);
    query.map_or_else(
        || format!("{server}/{database}"),
        |params| format!("{server}/{database}?{params}"),
    )
}

/// Creates and migrates a fresh database, or returns `None` when
/// `SQLRUN_TEST_DATABASE_URL` is unset.
///
/// # Errors
///
/// Returns an error if the database cannot be created or migrated.
pub async fn prepared_database() -> eyre::Result<Option<TemporaryDatabase>> {
    let Ok(admin_url) = env::var(TEST_DATABASE_URL_ENV) else {
        return Ok(None);
    };
    let name = format!("sqlrun_{}", Uuid::new_v4().simple());
    let create = format!("CREATE DATABASE \"{name}\"");
    let admin = admin_url.clone();
    tokio::task::spawn_blocking(move || -> eyre::Result<()> {
        let mut conn = PgConnection::establish(&admin)?;
        conn.batch_execute(&create)?;
        Ok(())
    })
    .await??;

    let pool = connect_pool(&database_url(&admin_url, &name), 4)?;
    let database = TemporaryDatabase {
        admin_url,
        name,
        pool,
    };
    run_migrations(&database.pool).await?;
    Ok(Some(database))
}

/// Builds a task with a fixed identifier.
pub fn task(value: u64, description: &str, db_name: &str) -> Task {
    let sequence = SequenceId::new(CounterType::Task, value).expect("non-zero value");
    let definition = TaskDefinition::new(
        description,
        db_name,
        "SELECT * FROM orders",
        "SELECT",
        "alice",
    )
    .expect("valid definition");
    Task::new(
        TaskId::from_sequence(sequence).expect("task counter"),
        definition,
        &DefaultClock,
    )
}

#[cfg(test)]
mod tests {
    use super::database_url;
    use rstest::rstest;

    #[rstest]
    #[case("postgres://u:p@localhost:5432/postgres", "postgres://u:p@localhost:5432/sqlrun_x")]
    #[case(
        "postgres://u@db/postgres?sslmode=disable",
        "postgres://u@db/sqlrun_x?sslmode=disable"
    )]
    fn database_name_is_replaced(#[case] admin: &str, #[case] expected: &str) {
        assert_eq!(database_url(admin, "sqlrun_x"), expected);
    }
}
