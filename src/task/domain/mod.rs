//! Domain model for stored SQL tasks.
//!
//! A task is a user-authored SQL statement plus the metadata needed to run
//! it: the logical database it targets and the declared statement kind.
//! Tasks are keyed by their allocated [`TaskId`] only; storage identities
//! never leave the adapters.

mod error;
mod ids;
mod query_type;
mod task;

pub use error::{ParseQueryTypeError, TaskDomainError};
pub use ids::TaskId;
pub use query_type::QueryType;
pub use task::{PersistedTaskData, Task, TaskDefinition, TaskPatch};
