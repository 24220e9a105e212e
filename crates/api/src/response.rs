//! Shared response envelope types for API handlers.
//!
//! Single resources use `{ "data": ... }`; list endpoints use
//! `{ "total": n, "data": [...] }` where `total` counts the whole filtered
//! set, not just the returned page.

use fedtube_core::listing::ResultPage;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "total": n, "data": [...] }` envelope for list endpoints.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub total: i64,
    pub data: Vec<T>,
}

impl<T: Serialize> From<ResultPage<T>> for PageResponse<T> {
    fn from(page: ResultPage<T>) -> Self {
        Self {
            total: page.total,
            data: page.items,
        }
    }
}
