//! Query executor port: one short-lived connection per run.

use crate::environment::domain::ConnectionParams;
use crate::run::domain::QueryOutcome;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Row-capture query run on the same connection before the statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreImageQuery {
    sql: String,
    row_limit: usize,
}

impl PreImageQuery {
    /// Creates a pre-image query keeping at most `row_limit` rows.
    #[must_use]
    pub fn new(sql: impl Into<String>, row_limit: usize) -> Self {
        Self {
            sql: sql.into(),
            row_limit,
        }
    }

    /// Returns the `SELECT` text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the row cap.
    #[must_use]
    pub const fn row_limit(&self) -> usize {
        self.row_limit
    }
}

/// What the executor runs for one task execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    statement: String,
    row_limit: usize,
    pre_image: Option<PreImageQuery>,
}

impl ExecutionPlan {
    /// Creates a plan executing `statement` verbatim, keeping at most
    /// `row_limit` result rows.
    #[must_use]
    pub fn new(statement: impl Into<String>, row_limit: usize) -> Self {
        Self {
            statement: statement.into(),
            row_limit,
            pre_image: None,
        }
    }

    /// Adds a pre-image capture before the statement.
    #[must_use]
    pub fn with_pre_image(mut self, query: PreImageQuery) -> Self {
        self.pre_image = Some(query);
        self
    }

    /// Returns the statement text.
    #[must_use]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Returns the result row cap.
    #[must_use]
    pub const fn row_limit(&self) -> usize {
        self.row_limit
    }

    /// Returns the pre-image capture, if any.
    #[must_use]
    pub const fn pre_image(&self) -> Option<&PreImageQuery> {
        self.pre_image.as_ref()
    }
}

/// Outcome of a completed statement and of its pre-image capture.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    outcome: QueryOutcome,
    pre_image: Option<Result<QueryOutcome, QueryExecutionError>>,
}

impl ExecutionReport {
    /// Creates a report for a statement run without a pre-image.
    #[must_use]
    pub const fn new(outcome: QueryOutcome) -> Self {
        Self {
            outcome,
            pre_image: None,
        }
    }

    /// Attaches the result of the pre-image capture.
    #[must_use]
    pub fn with_pre_image(mut self, pre_image: Result<QueryOutcome, QueryExecutionError>) -> Self {
        self.pre_image = Some(pre_image);
        self
    }

    /// Returns the statement outcome.
    #[must_use]
    pub const fn outcome(&self) -> &QueryOutcome {
        &self.outcome
    }

    /// Returns the pre-image capture result, if one was requested.
    #[must_use]
    pub const fn pre_image(&self) -> Option<&Result<QueryOutcome, QueryExecutionError>> {
        self.pre_image.as_ref()
    }

    /// Splits the report into its statement and pre-image results.
    #[must_use]
    pub fn into_parts(self) -> (QueryOutcome, Option<Result<QueryOutcome, QueryExecutionError>>) {
        (self.outcome, self.pre_image)
    }
}

/// Errors raised while talking to a target database.
#[derive(Debug, Clone, Error)]
pub enum QueryExecutionError {
    /// The connection could not be opened.
    #[error("could not connect to {target}: {source}")]
    Connection {
        /// `host:port` of the target.
        target: String,
        /// Driver error.
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// The server rejected or failed the statement.
    #[error("{0}")]
    Statement(Arc<dyn std::error::Error + Send + Sync>),
}

impl PartialEq for QueryExecutionError {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl QueryExecutionError {
    /// Wraps a connection failure for `target`.
    pub fn connection(
        target: impl Into<String>,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection {
            target: target.into(),
            source: Arc::new(err),
        }
    }

    /// Wraps a statement failure.
    pub fn statement(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Statement(Arc::new(err))
    }
}

/// Executes a plan against a live target database.
///
/// Implementations open one connection per call, run the optional pre-image
/// capture and then the statement on it, and release the connection on
/// every exit path.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Executes `plan` on a fresh connection described by `connection`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryExecutionError::Connection`] when the connection
    /// cannot be opened and [`QueryExecutionError::Statement`] when the
    /// statement fails. A failed pre-image capture is reported inside the
    /// [`ExecutionReport`] instead.
    async fn execute(
        &self,
        connection: &ConnectionParams,
        plan: &ExecutionPlan,
    ) -> Result<ExecutionReport, QueryExecutionError>;
}
