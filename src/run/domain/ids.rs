//! Run identifier.

use super::RunDomainError;
use crate::identifier::domain::{CounterType, SequenceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a run record, rendered as `RUN-000001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RunId(SequenceId);

impl RunId {
    /// Wraps an identifier the allocator minted from the run counter.
    pub(crate) const fn from_allocated(id: SequenceId) -> Self {
        Self(id)
    }

    /// Parses the canonical rendering.
    ///
    /// # Errors
    ///
    /// Returns [`RunDomainError::InvalidRunId`] for anything other than a
    /// canonical `RUN-` identifier.
    pub fn parse(raw: &str) -> Result<Self, RunDomainError> {
        SequenceId::parse(CounterType::Run, raw.trim())
            .map(Self)
            .map_err(|_| RunDomainError::InvalidRunId(raw.to_owned()))
    }

    /// Returns the underlying sequence value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0.value()
    }
}

impl TryFrom<String> for RunId {
    type Error = RunDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RunId> for String {
    fn from(value: RunId) -> Self {
        value.to_string()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
