//! Paging and search parameters shared by the task and run listings.

use serde::{Deserialize, Serialize};

/// Default number of records returned when no limit is given.
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// Largest page a single listing call may request.
pub const MAX_PAGE_LIMIT: usize = 1000;

/// Case-insensitive substring filter.
///
/// The term is trimmed on construction; blank input yields no filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Creates a search term, returning `None` for blank input.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    /// Returns the trimmed term.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether any of `fields` contains the term, ignoring case.
    #[must_use]
    pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        let needle = self.0.to_lowercase();
        fields
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Returns an `ILIKE` pattern matching the term anywhere in a value.
    ///
    /// `%`, `_` and `\` in the term are escaped so they match literally.
    #[must_use]
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}

/// Offset/limit window with an optional search filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    skip: usize,
    limit: usize,
    search: Option<SearchTerm>,
}

impl PageRequest {
    /// Creates a page request. `limit` is clamped to [`MAX_PAGE_LIMIT`].
    #[must_use]
    pub fn new(skip: usize, limit: usize) -> Self {
        Self {
            skip,
            limit: limit.min(MAX_PAGE_LIMIT),
            search: None,
        }
    }

    /// Sets the search filter; blank terms clear it.
    #[must_use]
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = SearchTerm::new(search);
        self
    }

    /// Returns the number of matching records to skip.
    #[must_use]
    pub const fn skip(&self) -> usize {
        self.skip
    }

    /// Returns the maximum number of records to return.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the search filter, if any.
    #[must_use]
    pub const fn search(&self) -> Option<&SearchTerm> {
        self.search.as_ref()
    }

    /// Returns `skip` as a SQL offset.
    #[must_use]
    pub fn offset_i64(&self) -> i64 {
        i64::try_from(self.skip).unwrap_or(i64::MAX)
    }

    /// Returns `limit` as a SQL limit.
    #[must_use]
    pub fn limit_i64(&self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX)
    }

    /// Applies the window to records already filtered and ordered.
    pub fn window<T>(&self, records: impl IntoIterator<Item = T>) -> Vec<T> {
        records
            .into_iter()
            .skip(self.skip)
            .take(self.limit)
            .collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_LIMIT)
    }
}
