//! The generic list service.
//!
//! One [`ListService::list`] serves every [`Listable`] resource. Matching,
//! ordering and paging are delegated to a [`ListExecutor`] (the store); this
//! module only enforces that the descriptor and query handed to the store
//! belong to the resource being listed.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CoreError;
use crate::filters::FilterDescriptor;
use crate::pagination::ListQuery;
use crate::resources::Listable;
use crate::types::DbId;

/// One page of results plus the size of the full matching set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    /// Count over the whole filtered set, independent of the page window.
    pub total: i64,
}

impl<T> ResultPage<T> {
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Store-side execution of a list request for resource `R`.
///
/// `scope_id` is the owning account id, or `None` for instance-wide
/// listings. Implementations must order by `query.sort` (ties broken by id),
/// apply `query.start`/`query.count` as offset/limit, and compute `total`
/// over the filtered set before paging.
#[async_trait]
pub trait ListExecutor<R: Listable>: Send + Sync {
    type Item: Send;

    async fn execute_list(
        &self,
        scope_id: Option<DbId>,
        query: &ListQuery,
        filter: &FilterDescriptor,
    ) -> Result<ResultPage<Self::Item>, CoreError>;
}

/// Entry point for all account listings.
pub struct ListService;

impl ListService {
    /// List resources of type `R`.
    ///
    /// # Panics
    ///
    /// Panics if `filter` was composed for another resource type or the sort
    /// key is not in `R`'s whitelist; both mean a handler wired the wrong
    /// resource and can never be caused by request input.
    pub async fn list<R, E>(
        executor: &E,
        scope_id: Option<DbId>,
        query: &ListQuery,
        filter: &FilterDescriptor,
    ) -> Result<ResultPage<E::Item>, CoreError>
    where
        R: Listable,
        E: ListExecutor<R> + ?Sized,
    {
        assert_eq!(
            filter.kind(),
            R::KIND,
            "filter descriptor composed for {} used to list {}",
            filter.kind(),
            R::KIND,
        );
        assert!(
            R::SORT.allows(query.sort.field),
            "sort field {} is not sortable for {}",
            query.sort.field,
            R::KIND,
        );

        executor.execute_list(scope_id, query, filter).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
