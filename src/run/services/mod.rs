//! Application services for executing tasks and reading run records.

mod runner;

pub use runner::{ExecuteRunRequest, RunService, RunServiceError, RunServiceResult};
