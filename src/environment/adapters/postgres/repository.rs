//! `PostgreSQL` repository implementation for environment configuration.

use super::{models::EnvironmentConfigRow, schema::environment_configs};
use crate::environment::{
    domain::{ConnectionParams, Environment, EnvironmentConfig},
    ports::{
        EnvironmentConfigRepository, EnvironmentConfigRepositoryError,
        EnvironmentConfigRepositoryResult,
    },
};
use crate::postgres::{PgPool, get_conn_with, run_blocking_with};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed environment configuration repository.
#[derive(Debug, Clone)]
pub struct PostgresEnvironmentConfigRepository {
    pool: PgPool,
}

impl PostgresEnvironmentConfigRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> EnvironmentConfigRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> EnvironmentConfigRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection =
                    get_conn_with(&pool, EnvironmentConfigRepositoryError::persistence)?;
                f(&mut connection)
            },
            EnvironmentConfigRepositoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl EnvironmentConfigRepository for PostgresEnvironmentConfigRepository {
    async fn find(
        &self,
        config_key: &str,
        environment: &Environment,
    ) -> EnvironmentConfigRepositoryResult<Option<EnvironmentConfig>> {
        let key = config_key.to_owned();
        let env = environment.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = environment_configs::table
                .filter(environment_configs::config_key.eq(key))
                .filter(environment_configs::environment.eq(env))
                .select(EnvironmentConfigRow::as_select())
                .first::<EnvironmentConfigRow>(connection)
                .optional()
                .map_err(EnvironmentConfigRepositoryError::persistence)?;
            row.map(row_to_config).transpose()
        })
        .await
    }

    async fn upsert(&self, config: &EnvironmentConfig) -> EnvironmentConfigRepositoryResult<()> {
        let row = to_row(config);
        self.run_blocking(move |connection| {
            diesel::insert_into(environment_configs::table)
                .values(&row)
                .on_conflict((
                    environment_configs::config_key,
                    environment_configs::environment,
                ))
                .do_update()
                .set(&row)
                .execute(connection)
                .map_err(EnvironmentConfigRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn remove(
        &self,
        config_key: &str,
        environment: &Environment,
    ) -> EnvironmentConfigRepositoryResult<bool> {
        let key = config_key.to_owned();
        let env = environment.as_str().to_owned();
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                environment_configs::table
                    .filter(environment_configs::config_key.eq(key))
                    .filter(environment_configs::environment.eq(env)),
            )
            .execute(connection)
            .map_err(EnvironmentConfigRepositoryError::persistence)?;
            Ok(removed > 0)
        })
        .await
    }

    async fn list_for_key(
        &self,
        config_key: &str,
    ) -> EnvironmentConfigRepositoryResult<Vec<EnvironmentConfig>> {
        let key = config_key.to_owned();
        self.run_blocking(move |connection| {
            let rows = environment_configs::table
                .filter(environment_configs::config_key.eq(key))
                .order(environment_configs::environment.asc())
                .select(EnvironmentConfigRow::as_select())
                .load::<EnvironmentConfigRow>(connection)
                .map_err(EnvironmentConfigRepositoryError::persistence)?;
            rows.into_iter().map(row_to_config).collect()
        })
        .await
    }
}

fn to_row(config: &EnvironmentConfig) -> EnvironmentConfigRow {
    let connection = config.connection();
    EnvironmentConfigRow {
        config_key: config.config_key().to_owned(),
        environment: config.environment().as_str().to_owned(),
        host: connection.host().to_owned(),
        port: i32::from(connection.port()),
        database_name: connection.database().to_owned(),
        username: connection.username().to_owned(),
        password: connection.password().to_owned(),
        updated_at: config.updated_at(),
    }
}

fn row_to_config(row: EnvironmentConfigRow) -> EnvironmentConfigRepositoryResult<EnvironmentConfig> {
    let EnvironmentConfigRow {
        config_key,
        environment,
        host,
        port,
        database_name,
        username,
        password,
        updated_at,
    } = row;

    let tag = Environment::new(&environment).map_err(EnvironmentConfigRepositoryError::persistence)?;
    let port_number = u16::try_from(port).map_err(EnvironmentConfigRepositoryError::persistence)?;
    let connection = ConnectionParams::new(&host, port_number, &database_name, &username, password)
        .map_err(EnvironmentConfigRepositoryError::persistence)?;
    EnvironmentConfig::from_persisted(&config_key, tag, connection, updated_at)
        .map_err(EnvironmentConfigRepositoryError::persistence)
}
