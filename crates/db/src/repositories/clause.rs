//! Dynamic WHERE / ORDER BY construction shared by the list repositories.
//!
//! Conditions carry positional placeholders (`$1`, `$2`, ...) in the order
//! their values were pushed; [`bind_values`] and [`bind_values_scalar`] bind
//! them back in the same order.

use fedtube_core::pagination::SortKey;

/// A value bound to a positional placeholder.
#[derive(Debug, Clone)]
pub(crate) enum BindValue {
    BigInt(i64),
    Text(String),
    TextArray(Vec<String>),
    IntArray(Vec<i32>),
}

/// Accumulates `AND`-joined conditions and their bind values.
#[derive(Debug, Default)]
pub(crate) struct WhereClause {
    conditions: Vec<String>,
    binds: Vec<BindValue>,
}

impl WhereClause {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a condition with one bound value. `condition` receives the
    /// placeholder (e.g. `"$3"`) to embed.
    pub(crate) fn bind(&mut self, value: BindValue, condition: impl FnOnce(&str) -> String) {
        let placeholder = format!("${}", self.binds.len() + 1);
        self.conditions.push(condition(&placeholder));
        self.binds.push(value);
    }

    /// Add a condition without bound values.
    pub(crate) fn push(&mut self, condition: impl Into<String>) {
        self.conditions.push(condition.into());
    }

    /// Index of the next free placeholder (for LIMIT / OFFSET).
    pub(crate) fn next_index(&self) -> usize {
        self.binds.len() + 1
    }

    pub(crate) fn binds(&self) -> &[BindValue] {
        &self.binds
    }

    pub(crate) fn to_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }
}

/// A resolved `ORDER BY` clause. Only built from whitelisted columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy(String);

impl OrderBy {
    /// Map `sort` through `column` and append an ascending `tie_breaker`.
    /// Returns `None` if the sort field has no column mapping.
    pub fn resolve(
        sort: &SortKey,
        column: fn(&str) -> Option<&'static str>,
        tie_breaker: &'static str,
    ) -> Option<Self> {
        let col = column(sort.field)?;
        let dir = if sort.descending { "DESC" } else { "ASC" };
        Some(Self(format!("ORDER BY {col} {dir}, {tie_breaker} ASC")))
    }

    pub fn as_sql(&self) -> &str {
        &self.0
    }
}

/// Build an `ILIKE` pattern matching `search` as a literal substring.
pub(crate) fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
pub(crate) fn bind_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::TextArray(v) => q = q.bind(v.clone()),
            BindValue::IntArray(v) => q = q.bind(v.clone()),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
pub(crate) fn bind_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::TextArray(v) => q = q.bind(v.clone()),
            BindValue::IntArray(v) => q = q.bind(v.clone()),
        }
    }
    q
}
