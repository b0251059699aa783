//! Shaped results of executing one statement.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One result row: column names mapped to JSON values in column order.
pub type RowMap = Map<String, Value>;

/// Rows and counts captured from one statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    rows: Vec<RowMap>,
    rows_affected: u64,
    truncated: bool,
}

impl QueryOutcome {
    /// Creates an outcome from captured rows.
    #[must_use]
    pub const fn new(rows: Vec<RowMap>, rows_affected: u64, truncated: bool) -> Self {
        Self {
            rows,
            rows_affected,
            truncated,
        }
    }

    /// Creates an outcome for a statement that returned no rows.
    #[must_use]
    pub const fn affected(rows_affected: u64) -> Self {
        Self::new(Vec::new(), rows_affected, false)
    }

    /// Keeps at most `limit` rows, flagging truncation when rows are dropped.
    #[must_use]
    pub fn capped(mut self, limit: usize) -> Self {
        if self.rows.len() > limit {
            self.rows.truncate(limit);
            self.truncated = true;
        }
        self
    }

    /// Returns the captured rows.
    #[must_use]
    pub fn rows(&self) -> &[RowMap] {
        &self.rows
    }

    /// Consumes the outcome, returning its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<RowMap> {
        self.rows
    }

    /// Returns the affected-row count reported by the server.
    #[must_use]
    pub const fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    /// Returns whether more rows were available than were kept.
    #[must_use]
    pub const fn truncated(&self) -> bool {
        self.truncated
    }
}
