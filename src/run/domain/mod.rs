//! Domain model for run records and rollback generation.

mod error;
mod ids;
mod outcome;
mod rollback;
mod run;
mod status;

pub use error::RunDomainError;
pub use ids::RunId;
pub use outcome::{QueryOutcome, RowMap};
pub use rollback::{PreImagePlan, RollbackPlan, RollbackKind};
pub use run::{PersistedRunData, Run, RunRecord};
pub use status::RunStatus;
