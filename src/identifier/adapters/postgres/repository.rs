//! `PostgreSQL` counter store.
//!
//! Increments are a single `UPDATE ... RETURNING` statement. The row lock
//! taken by the update serializes concurrent writers across every process
//! connected to the database.

use super::schema::counters;
use crate::identifier::{
    domain::CounterType,
    ports::{CounterStore, CounterStoreError, CounterStoreResult},
};
use crate::postgres::{PgPool, get_conn_with, run_blocking_with};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed counter store.
#[derive(Debug, Clone)]
pub struct PostgresCounterStore {
    pool: PgPool,
}

impl PostgresCounterStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> CounterStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CounterStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, CounterStoreError::persistence)?;
                f(&mut connection)
            },
            CounterStoreError::persistence,
        )
        .await
    }
}

#[async_trait]
impl CounterStore for PostgresCounterStore {
    async fn seed(&self, counter_type: CounterType) -> CounterStoreResult<()> {
        self.run_blocking(move |connection| {
            diesel::insert_into(counters::table)
                .values((
                    counters::counter_type.eq(counter_type.as_str()),
                    counters::counter_value.eq(0_i64),
                ))
                .on_conflict_do_nothing()
                .execute(connection)
                .map_err(CounterStoreError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn increment(&self, counter_type: CounterType) -> CounterStoreResult<u64> {
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                counters::table
                    .filter(counters::counter_type.eq(counter_type.as_str()))
                    .filter(counters::counter_value.lt(i64::MAX)),
            )
            .set(counters::counter_value.eq(counters::counter_value + 1_i64))
            .returning(counters::counter_value)
            .get_result::<i64>(connection)
            .optional()
            .map_err(CounterStoreError::persistence)?;

            match updated {
                Some(value) => u64::try_from(value).map_err(CounterStoreError::persistence),
                None if read_counter(connection, counter_type)?.is_some() => {
                    Err(CounterStoreError::Overflow(counter_type))
                }
                None => Err(CounterStoreError::NotSeeded(counter_type)),
            }
        })
        .await
    }

    async fn current(&self, counter_type: CounterType) -> CounterStoreResult<Option<u64>> {
        self.run_blocking(move |connection| {
            read_counter(connection, counter_type)?
                .map(|value| u64::try_from(value).map_err(CounterStoreError::persistence))
                .transpose()
        })
        .await
    }
}

fn read_counter(
    connection: &mut PgConnection,
    counter_type: CounterType,
) -> CounterStoreResult<Option<i64>> {
    counters::table
        .filter(counters::counter_type.eq(counter_type.as_str()))
        .select(counters::counter_value)
        .first::<i64>(connection)
        .optional()
        .map_err(CounterStoreError::persistence)
}
