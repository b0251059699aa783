//! `sqlx` MySQL executor: one connection per run, text protocol.

use super::decode::decode_row;
use crate::environment::domain::ConnectionParams;
use crate::run::{
    domain::QueryOutcome,
    ports::{ExecutionPlan, ExecutionReport, QueryExecutionError, QueryExecutor},
};
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection, Either};
use tracing::{debug, warn};

/// How much of a result stream to read once the row cap is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drain {
    /// Keep reading and discard surplus rows; the connection stays usable.
    Full,
    /// Stop at the first surplus row; the connection must be dropped.
    StopAtCap,
}

struct Capture {
    outcome: QueryOutcome,
    drained: bool,
}

/// Executes plans against MySQL-compatible servers.
///
/// Each call opens its own connection, so concurrent runs never share
/// session state. Statements are sent verbatim over the text protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlQueryExecutor;

impl MySqlQueryExecutor {
    /// Creates a new executor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn connect(params: &ConnectionParams) -> Result<MySqlConnection, QueryExecutionError> {
        let mut options = MySqlConnectOptions::new()
            .host(params.host())
            .port(params.port())
            .username(params.username())
            .password(params.password());
        if !params.database().is_empty() {
            options = options.database(params.database());
        }
        options
            .connect()
            .await
            .map_err(|err| QueryExecutionError::connection(params.target(), err))
    }
}

async fn capture(
    connection: &mut MySqlConnection,
    sql: &str,
    row_limit: usize,
    drain: Drain,
) -> Result<Capture, sqlx::Error> {
    let mut stream = sqlx::raw_sql(sql).fetch_many(&mut *connection);
    let mut rows = Vec::new();
    let mut rows_affected = 0_u64;
    let mut truncated = false;

    while let Some(item) = stream.try_next().await? {
        match item {
            Either::Left(done) => {
                rows_affected = rows_affected.saturating_add(done.rows_affected());
            }
            Either::Right(_) if rows.len() >= row_limit => {
                truncated = true;
                if drain == Drain::StopAtCap {
                    return Ok(Capture {
                        outcome: QueryOutcome::new(rows, rows_affected, truncated),
                        drained: false,
                    });
                }
            }
            Either::Right(row) => rows.push(decode_row(&row)?),
        }
    }

    Ok(Capture {
        outcome: QueryOutcome::new(rows, rows_affected, truncated),
        drained: true,
    })
}

#[async_trait]
impl QueryExecutor for MySqlQueryExecutor {
    async fn execute(
        &self,
        connection: &ConnectionParams,
        plan: &ExecutionPlan,
    ) -> Result<ExecutionReport, QueryExecutionError> {
        let target = connection.target();
        let mut conn = Self::connect(connection).await?;
        debug!(%target, "connected to target database");

        let mut pre_image = None;
        if let Some(query) = plan.pre_image() {
            let captured = capture(&mut conn, query.sql(), query.row_limit(), Drain::Full)
                .await
                .map(|result| result.outcome)
                .map_err(QueryExecutionError::statement);
            if let Err(err) = &captured {
                warn!(%target, error = %err, "pre-image capture failed");
            }
            pre_image = Some(captured);
        }

        let statement = capture(&mut conn, plan.statement(), plan.row_limit(), Drain::StopAtCap)
            .await
            .map_err(QueryExecutionError::statement)?;

        if statement.drained {
            if let Err(err) = conn.close().await {
                debug!(%target, error = %err, "closing target connection failed");
            }
        } else {
            drop(conn);
        }

        let mut report = ExecutionReport::new(statement.outcome);
        if let Some(captured) = pre_image {
            report = report.with_pre_image(captured);
        }
        Ok(report)
    }
}
