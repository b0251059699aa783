//! Port contracts for run storage and live query execution.

pub mod executor;
pub mod repository;

pub use executor::{
    ExecutionPlan, ExecutionReport, PreImageQuery, QueryExecutionError, QueryExecutor,
};
pub use repository::{RunRepository, RunRepositoryError, RunRepositoryResult};
