//! Scripted query executor for tests and dry runs.
//!
//! Responses are replayed in order; every call is recorded so callers can
//! assert on what would have reached a live database.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::environment::domain::ConnectionParams;
use crate::run::{
    domain::QueryOutcome,
    ports::{ExecutionPlan, ExecutionReport, QueryExecutionError, QueryExecutor},
};

type ScriptedResponse = Result<ExecutionReport, QueryExecutionError>;

/// A call observed by [`ScriptedQueryExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedExecution {
    /// Connection the call targeted.
    pub connection: ConnectionParams,
    /// Plan the call carried.
    pub plan: ExecutionPlan,
}

#[derive(Debug, Default)]
struct ScriptState {
    responses: VecDeque<ScriptedResponse>,
    calls: Vec<RecordedExecution>,
}

/// Executor replaying pre-programmed responses.
///
/// With no responses queued, each call succeeds with zero affected rows.
#[derive(Debug, Clone, Default)]
pub struct ScriptedQueryExecutor {
    state: Arc<Mutex<ScriptState>>,
    delay: Option<Duration>,
}

impl ScriptedQueryExecutor {
    /// Creates an executor with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeps for `delay` before answering each call.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues the response for the next unanswered call.
    pub fn push_response(&self, response: ScriptedResponse) {
        self.lock().responses.push_back(response);
    }

    /// Returns the calls observed so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedExecution> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl QueryExecutor for ScriptedQueryExecutor {
    async fn execute(
        &self,
        connection: &ConnectionParams,
        plan: &ExecutionPlan,
    ) -> Result<ExecutionReport, QueryExecutionError> {
        let response = {
            let mut state = self.lock();
            state.calls.push(RecordedExecution {
                connection: connection.clone(),
                plan: plan.clone(),
            });
            state.responses.pop_front()
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        response.unwrap_or_else(|| Ok(ExecutionReport::new(QueryOutcome::affected(0))))
    }
}
