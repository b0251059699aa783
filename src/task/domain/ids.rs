//! Task identifier.

use super::TaskDomainError;
use crate::identifier::domain::{CounterType, SequenceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a stored task, rendered as `TSK-000001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(SequenceId);

impl TaskId {
    /// Wraps an allocated sequence identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTaskId`] when `id` was not minted
    /// from the task counter.
    pub fn from_sequence(id: SequenceId) -> Result<Self, TaskDomainError> {
        if id.counter_type() != CounterType::Task {
            return Err(TaskDomainError::InvalidTaskId(id.to_string()));
        }
        Ok(Self(id))
    }

    /// Wraps an identifier the allocator minted from the task counter.
    pub(crate) const fn from_allocated(id: SequenceId) -> Self {
        Self(id)
    }

    /// Parses the canonical rendering.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTaskId`] for anything other than a
    /// canonical `TSK-` identifier.
    pub fn parse(raw: &str) -> Result<Self, TaskDomainError> {
        SequenceId::parse(CounterType::Task, raw.trim())
            .map(Self)
            .map_err(|_| TaskDomainError::InvalidTaskId(raw.to_owned()))
    }

    /// Returns the underlying sequence value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0.value()
    }
}

impl TryFrom<String> for TaskId {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TaskId> for String {
    fn from(value: TaskId) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
