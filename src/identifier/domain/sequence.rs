//! Rendered sequence identifiers.

use super::CounterType;
use std::fmt;
use thiserror::Error;

/// Minimum number of digits rendered after the prefix.
pub const SEQUENCE_DIGITS: usize = 6;

/// An allocated identifier: a counter category and its sequence value.
///
/// Values are at least 1; the counter is seeded at 0 and the first
/// allocation returns 1. Values beyond `999_999` simply render wider.
///
/// # Examples
///
/// ```
/// use sqlrun::identifier::domain::{CounterType, SequenceId};
///
/// let id = SequenceId::new(CounterType::Task, 1).expect("non-zero value");
/// assert_eq!(id.to_string(), "TSK-000001");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceId {
    counter_type: CounterType,
    value: u64,
}

impl SequenceId {
    /// Creates an identifier from a counter value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseSequenceIdError::ZeroValue`] when `value` is zero.
    pub const fn new(counter_type: CounterType, value: u64) -> Result<Self, ParseSequenceIdError> {
        if value == 0 {
            return Err(ParseSequenceIdError::ZeroValue(counter_type));
        }
        Ok(Self {
            counter_type,
            value,
        })
    }

    /// Parses the rendered form, requiring the prefix of `counter_type`.
    ///
    /// Only the canonical rendering is accepted: `TSK-1` and
    /// `TSK-0000001` are both rejected, so each identifier has exactly one
    /// textual form.
    ///
    /// # Errors
    ///
    /// Returns [`ParseSequenceIdError::Malformed`] when the text is not the
    /// canonical rendering of a non-zero value with the expected prefix.
    pub fn parse(counter_type: CounterType, raw: &str) -> Result<Self, ParseSequenceIdError> {
        let malformed = || ParseSequenceIdError::Malformed {
            counter_type,
            value: raw.to_owned(),
        };
        let digits = raw
            .strip_prefix(counter_type.prefix())
            .and_then(|rest| rest.strip_prefix('-'))
            .ok_or_else(malformed)?;
        if digits.len() < SEQUENCE_DIGITS || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(malformed());
        }
        let value = digits.parse::<u64>().map_err(|_| malformed())?;
        let parsed = Self::new(counter_type, value).map_err(|_| malformed())?;
        if parsed.to_string() != raw {
            return Err(malformed());
        }
        Ok(parsed)
    }

    /// Returns the counter category.
    #[must_use]
    pub const fn counter_type(self) -> CounterType {
        self.counter_type
    }

    /// Returns the numeric sequence value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.value
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:0width$}",
            self.counter_type.prefix(),
            self.value,
            width = SEQUENCE_DIGITS
        )
    }
}

/// Errors returned while constructing or parsing sequence identifiers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseSequenceIdError {
    /// Sequence values start at 1.
    #[error("{0} identifiers start at 1")]
    ZeroValue(CounterType),

    /// The text is not a canonical identifier for the category.
    #[error("invalid {counter_type} identifier '{value}'")]
    Malformed {
        /// Expected counter category.
        counter_type: CounterType,
        /// Rejected input.
        value: String,
    },
}
