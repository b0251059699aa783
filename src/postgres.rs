//! Shared `PostgreSQL` plumbing for the Diesel-backed adapters.
//!
//! Every repository offloads synchronous Diesel work to the blocking thread
//! pool through [`run_blocking_with`], so the async executor's workers are
//! never parked on socket I/O.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;

/// `PostgreSQL` connection pool type shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Pooled connection type for internal use.
pub(crate) type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors returned while preparing the metadata database.
#[derive(Debug, Error)]
pub enum SchemaSetupError {
    /// A pooled connection could not be obtained.
    #[error("failed to obtain a database connection: {0}")]
    Connection(#[from] PoolError),

    /// A migration failed to apply.
    #[error("failed to apply migrations: {0}")]
    Migration(String),

    /// The blocking worker panicked or was cancelled.
    #[error("migration task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`PoolError`] when the pool cannot establish its first
/// connection.
pub fn connect_pool(database_url: &str, max_size: u32) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build(manager)
}

/// Applies pending migrations and returns the versions that ran.
///
/// # Errors
///
/// Returns [`SchemaSetupError`] when a connection cannot be obtained or a
/// migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<Vec<String>, SchemaSetupError> {
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get()?;
        let applied = connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| SchemaSetupError::Migration(err.to_string()))?;
        let versions = applied.iter().map(ToString::to_string).collect::<Vec<_>>();
        tracing::info!(count = versions.len(), "applied pending migrations");
        Ok(versions)
    })
    .await?
}

/// Runs a blocking task and maps join errors into the caller's error type.
pub(crate) async fn run_blocking_with<F, T, E, M>(f: F, map_err: M) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: FnOnce(tokio::task::JoinError) -> E,
{
    tokio::task::spawn_blocking(f).await.map_err(map_err)?
}

/// Obtains a connection from the pool with a caller-provided error mapper.
pub(crate) fn get_conn_with<E, M>(pool: &PgPool, map_err: M) -> Result<PooledConn, E>
where
    M: FnOnce(PoolError) -> E,
{
    pool.get().map_err(map_err)
}
