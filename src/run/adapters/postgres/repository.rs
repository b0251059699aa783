//! `PostgreSQL` repository implementation for run records.

use super::{models::RunRow, schema::runs};
use crate::environment::domain::Environment;
use crate::listing::{PageRequest, SearchTerm};
use crate::postgres::{PgPool, get_conn_with, run_blocking_with};
use crate::run::{
    domain::{PersistedRunData, RowMap, Run, RunId, RunRecord, RunStatus},
    ports::{RunRepository, RunRepositoryError, RunRepositoryResult},
};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_json::Value;

/// `PostgreSQL`-backed run repository.
#[derive(Debug, Clone)]
pub struct PostgresRunRepository {
    pool: PgPool,
}

impl PostgresRunRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> RunRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RunRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, RunRepositoryError::persistence)?;
                f(&mut connection)
            },
            RunRepositoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl RunRepository for PostgresRunRepository {
    async fn store(&self, run: &Run) -> RunRepositoryResult<()> {
        let run_id = run.id();
        let row = to_row(run)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(runs::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        RunRepositoryError::DuplicateRun(run_id)
                    }
                    _ => RunRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: RunId) -> RunRepositoryResult<Option<Run>> {
        self.run_blocking(move |connection| {
            let row = runs::table
                .filter(runs::run_task_id.eq(id.to_string()))
                .select(RunRow::as_select())
                .first::<RunRow>(connection)
                .optional()
                .map_err(RunRepositoryError::persistence)?;
            row.map(row_to_run).transpose()
        })
        .await
    }

    async fn list(&self, page: &PageRequest) -> RunRepositoryResult<Vec<Run>> {
        let pattern = page.search().map(SearchTerm::like_pattern);
        let offset = page.offset_i64();
        let limit = page.limit_i64();

        self.run_blocking(move |connection| {
            let mut query = runs::table
                .select(RunRow::as_select())
                .order(runs::seq.asc())
                .into_boxed();
            if let Some(like) = pattern {
                query = query.filter(
                    runs::run_task_id
                        .ilike(like.clone())
                        .or(runs::task_id.ilike(like.clone()))
                        .or(runs::status.ilike(like.clone()))
                        .or(runs::environment.ilike(like.clone()))
                        .or(runs::created_by.ilike(like)),
                );
            }
            let rows = query
                .offset(offset)
                .limit(limit)
                .load::<RunRow>(connection)
                .map_err(RunRepositoryError::persistence)?;
            rows.into_iter().map(row_to_run).collect()
        })
        .await
    }
}

fn to_row(run: &Run) -> RunRepositoryResult<RunRow> {
    let rows_affected = run
        .rows_affected()
        .map(i64::try_from)
        .transpose()
        .map_err(RunRepositoryError::persistence)?;
    let execution_time_ms =
        i64::try_from(run.execution_time_ms()).map_err(RunRepositoryError::persistence)?;

    Ok(RunRow {
        run_task_id: run.id().to_string(),
        task_id: run.task_id().to_string(),
        environment: run.environment().as_str().to_owned(),
        status: run.status().as_str().to_owned(),
        message: run.message().to_owned(),
        data: Value::Array(run.data().iter().cloned().map(Value::Object).collect()),
        truncated: run.truncated(),
        rows_affected,
        rollback_query: run.rollback_query().map(str::to_owned),
        execution_time_ms,
        task_description: run.task_description().to_owned(),
        sql_query: run.sql_query().to_owned(),
        created_by: run.created_by().to_owned(),
        created_at: run.created_at(),
    })
}

fn row_to_run(row: RunRow) -> RunRepositoryResult<Run> {
    let RunRow {
        run_task_id,
        task_id,
        environment,
        status,
        message,
        data,
        truncated,
        rows_affected,
        rollback_query,
        execution_time_ms,
        task_description,
        sql_query,
        created_by,
        created_at,
    } = row;

    let id = RunId::parse(&run_task_id).map_err(RunRepositoryError::persistence)?;
    let record = RunRecord {
        task_id: TaskId::parse(&task_id).map_err(RunRepositoryError::persistence)?,
        environment: Environment::new(&environment).map_err(RunRepositoryError::persistence)?,
        status: RunStatus::try_from(status.as_str()).map_err(RunRepositoryError::persistence)?,
        message,
        data: serde_json::from_value::<Vec<RowMap>>(data)
            .map_err(RunRepositoryError::persistence)?,
        truncated,
        rows_affected: rows_affected
            .map(u64::try_from)
            .transpose()
            .map_err(RunRepositoryError::persistence)?,
        rollback_query,
        execution_time_ms: u64::try_from(execution_time_ms)
            .map_err(RunRepositoryError::persistence)?,
        task_description,
        sql_query,
        created_by,
    };

    Ok(Run::from_persisted(PersistedRunData {
        id,
        record,
        created_at,
    }))
}
