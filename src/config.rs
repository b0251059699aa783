//! Runner settings shared by the run executor and its adapters.

use std::time::Duration;
use thiserror::Error;

/// Default bound on the live phase of a run.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of result rows kept on a run record.
pub const DEFAULT_ROW_LIMIT: usize = 25;

/// Default number of rows captured before an UPDATE or DELETE.
pub const DEFAULT_PRE_IMAGE_ROW_LIMIT: usize = 1000;

/// Errors returned while building [`RunSettings`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// The query timeout was zero.
    #[error("query timeout must be greater than zero")]
    ZeroTimeout,

    /// A row limit was zero.
    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

/// Limits applied to each run.
///
/// # Examples
///
/// ```
/// use sqlrun::config::RunSettings;
/// use std::time::Duration;
///
/// let settings = RunSettings::default()
///     .with_query_timeout(Duration::from_secs(5))
///     .expect("non-zero timeout");
/// assert_eq!(settings.row_limit(), 25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    query_timeout: Duration,
    row_limit: usize,
    pre_image_row_limit: usize,
}

impl RunSettings {
    /// Replaces the bound on connect, capture and statement execution.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] for a zero duration.
    pub const fn with_query_timeout(mut self, timeout: Duration) -> Result<Self, SettingsError> {
        if timeout.is_zero() {
            return Err(SettingsError::ZeroTimeout);
        }
        self.query_timeout = timeout;
        Ok(self)
    }

    /// Replaces the number of result rows kept on a run.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroLimit`] for zero.
    pub const fn with_row_limit(mut self, limit: usize) -> Result<Self, SettingsError> {
        if limit == 0 {
            return Err(SettingsError::ZeroLimit("row limit"));
        }
        self.row_limit = limit;
        Ok(self)
    }

    /// Replaces the number of rows captured for rollback generation.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroLimit`] for zero.
    pub const fn with_pre_image_row_limit(mut self, limit: usize) -> Result<Self, SettingsError> {
        if limit == 0 {
            return Err(SettingsError::ZeroLimit("pre-image row limit"));
        }
        self.pre_image_row_limit = limit;
        Ok(self)
    }

    /// Returns the live-phase bound.
    #[must_use]
    pub const fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Returns the result row cap.
    #[must_use]
    pub const fn row_limit(&self) -> usize {
        self.row_limit
    }

    /// Returns the pre-image row cap.
    #[must_use]
    pub const fn pre_image_row_limit(&self) -> usize {
        self.pre_image_row_limit
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            row_limit: DEFAULT_ROW_LIMIT,
            pre_image_row_limit: DEFAULT_PRE_IMAGE_ROW_LIMIT,
        }
    }
}
