//! Declared statement kind of a task.

use super::ParseQueryTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Statement kind a task declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String", into = "&'static str")]
pub enum QueryType {
    /// Read-only query returning rows.
    Select,
    /// Row insertion.
    Insert,
    /// Row modification.
    Update,
    /// Row removal.
    Delete,
}

impl QueryType {
    /// Returns the canonical upper-case representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }

    /// Returns whether the statement changes data.
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        !matches!(self, Self::Select)
    }
}

impl TryFrom<&str> for QueryType {
    type Error = ParseQueryTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SELECT" => Ok(Self::Select),
            "INSERT" => Ok(Self::Insert),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            _ => Err(ParseQueryTypeError(value.to_owned())),
        }
    }
}

impl TryFrom<String> for QueryType {
    type Error = ParseQueryTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<QueryType> for &'static str {
    fn from(value: QueryType) -> Self {
        value.as_str()
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
