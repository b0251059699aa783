//! Environment tags such as `QA`, `PREPROD` and `PROD`.

use super::EnvironmentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized environment tag.
///
/// Tags are trimmed and upper-cased, so `prod` and ` PROD ` name the same
/// environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Environment(String);

impl Environment {
    /// Parses and normalizes an environment tag.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentDomainError::InvalidEnvironment`] when the tag is
    /// blank or contains characters other than ASCII letters, digits, `_`
    /// and `-`.
    pub fn new(raw: &str) -> Result<Self, EnvironmentDomainError> {
        let trimmed = raw.trim();
        let valid = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-'));
        if !valid {
            return Err(EnvironmentDomainError::InvalidEnvironment(raw.to_owned()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the normalized tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Environment {
    type Error = EnvironmentDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Environment> for String {
    fn from(value: Environment) -> Self {
        value.0
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
