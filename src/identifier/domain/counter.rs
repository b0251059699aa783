//! Counter categories backing identifier allocation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Category of a shared counter.
///
/// Each category owns exactly one persisted counter and one identifier
/// prefix, so task and run identifiers never share a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CounterType {
    /// Counter minting task identifiers.
    Task,
    /// Counter minting run identifiers.
    Run,
}

impl CounterType {
    /// All counter categories, in seeding order.
    pub const ALL: [Self; 2] = [Self::Task, Self::Run];

    /// Returns the canonical storage tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "TASK",
            Self::Run => "RUN",
        }
    }

    /// Returns the identifier prefix rendered before the sequence value.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Task => "TSK",
            Self::Run => "RUN",
        }
    }
}

impl TryFrom<&str> for CounterType {
    type Error = ParseCounterTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "TASK" => Ok(Self::Task),
            "RUN" => Ok(Self::Run),
            _ => Err(ParseCounterTypeError(value.to_owned())),
        }
    }
}

impl fmt::Display for CounterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing counter categories from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown counter type: {0}")]
pub struct ParseCounterTypeError(pub String);
