//! Pagination and sort normalization for list endpoints.
//!
//! Turns the untrusted `start`, `count` and `sort` query parameters into a
//! [`ListQuery`]. `count` is clamped rather than rejected; a negative
//! `start` or a sort key outside the resource whitelist is an input error.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: i64 = 15;

/// Maximum number of items per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Page size bounds applied by [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDefaults {
    pub page_size: i64,
    pub max_page_size: i64,
}

impl Default for PageDefaults {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

// ---------------------------------------------------------------------------
// Sort keys
// ---------------------------------------------------------------------------

/// The sortable fields of one resource type and its default ordering.
#[derive(Debug, Clone, Copy)]
pub struct SortSpec {
    pub whitelist: &'static [&'static str],
    /// Default sort, in request syntax (e.g. `"-createdAt"`).
    pub default: &'static str,
}

impl SortSpec {
    pub fn allows(&self, field: &str) -> bool {
        self.whitelist.contains(&field)
    }
}

/// A validated sort key. `field` always points into a [`SortSpec`] whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: &'static str,
    pub descending: bool,
}

impl SortKey {
    /// Parse a request sort value; a leading `-` selects descending order.
    pub fn parse(raw: &str, spec: &SortSpec) -> Result<Self, CoreError> {
        let (name, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };

        let field = spec
            .whitelist
            .iter()
            .copied()
            .find(|allowed| *allowed == name)
            .ok_or_else(|| CoreError::InvalidSort {
                key: raw.to_string(),
                allowed: spec.whitelist.join(", "),
            })?;

        Ok(Self { field, descending })
    }
}

// ---------------------------------------------------------------------------
// ListQuery
// ---------------------------------------------------------------------------

/// A normalized page request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub start: i64,
    pub count: i64,
    pub sort: SortKey,
}

/// Build a [`ListQuery`] from raw request parameters.
pub fn normalize(
    start: Option<i64>,
    count: Option<i64>,
    sort: Option<&str>,
    spec: &SortSpec,
    defaults: PageDefaults,
) -> Result<ListQuery, CoreError> {
    let start = start.unwrap_or(0);
    if start < 0 {
        return Err(CoreError::InvalidPagination(format!(
            "start must be >= 0, got {start}"
        )));
    }

    let count = clamp_limit(count, defaults.page_size, defaults.max_page_size);
    let sort = SortKey::parse(sort.unwrap_or(spec.default), spec)?;

    Ok(ListQuery { start, count, sort })
}

/// Clamp a user-provided limit to `[1, max]`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
