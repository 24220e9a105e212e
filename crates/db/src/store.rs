//! The store seam between the HTTP layer and Postgres.
//!
//! [`Store`] bundles every [`ListExecutor`] plus the lookups the handlers
//! need, so the API can hold a single `Arc<dyn Store>`. [`PgStore`] is the
//! production implementation on top of the repositories.

use async_trait::async_trait;
use fedtube_core::account::AccountHandle;
use fedtube_core::error::CoreError;
use fedtube_core::filters::{FilterDescriptor, NsfwPolicy, ResourceFilter};
use fedtube_core::listing::{ListExecutor, ResultPage};
use fedtube_core::pagination::ListQuery;
use fedtube_core::resources::{Accounts, Channels, Listable, Playlists, Ratings, ResourceKind, Videos};
use fedtube_core::types::DbId;
use uuid::Uuid;

use crate::models::account::Account;
use crate::models::channel::Channel;
use crate::models::playlist::Playlist;
use crate::models::rating::Rating;
use crate::models::video::Video;
use crate::repositories::{
    AccountRepo, ChannelRepo, OrderBy, PlaylistRepo, RatingRepo, VideoRepo,
};
use crate::DbPool;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Account and caller-preference lookups.
#[async_trait]
pub trait AccountSource: Send + Sync {
    async fn find_account_by_handle(
        &self,
        handle: &AccountHandle,
    ) -> Result<Option<Account>, CoreError>;

    /// The NSFW preference of the local user owning `account_id`.
    async fn nsfw_policy_for(&self, account_id: DbId) -> Result<Option<NsfwPolicy>, CoreError>;
}

#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Find a playlist by UUID regardless of privacy; callers apply
    /// visibility.
    async fn find_playlist_by_uuid(&self, uuid: Uuid) -> Result<Option<Playlist>, CoreError>;
}

/// Liveness check for the health endpoint.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn is_healthy(&self) -> bool;
}

/// Everything the listing endpoints need from persistence.
pub trait Store:
    StoreHealth
    + AccountSource
    + PlaylistSource
    + ListExecutor<Accounts, Item = Account>
    + ListExecutor<Videos, Item = Video>
    + ListExecutor<Channels, Item = Channel>
    + ListExecutor<Playlists, Item = Playlist>
    + ListExecutor<Ratings, Item = Rating>
{
}

impl<T> Store for T where
    T: StoreHealth
        + AccountSource
        + PlaylistSource
        + ListExecutor<Accounts, Item = Account>
        + ListExecutor<Videos, Item = Video>
        + ListExecutor<Channels, Item = Channel>
        + ListExecutor<Playlists, Item = Playlist>
        + ListExecutor<Ratings, Item = Rating>
{
}

// ---------------------------------------------------------------------------
// PgStore
// ---------------------------------------------------------------------------

/// Postgres-backed [`Store`].
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx failure to the store-unavailable error. Never retried here.
fn store_error(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Store query failed");
    CoreError::StoreUnavailable(err.to_string())
}

fn order_by<R: Listable>(
    query: &ListQuery,
    column: fn(&str) -> Option<&'static str>,
    tie_breaker: &'static str,
) -> Result<OrderBy, CoreError> {
    OrderBy::resolve(&query.sort, column, tie_breaker).ok_or_else(|| {
        CoreError::Internal(format!(
            "no column mapping for {} sort field {}",
            R::KIND,
            query.sort.field
        ))
    })
}

fn owner_scope(scope_id: Option<DbId>, kind: ResourceKind) -> Result<DbId, CoreError> {
    scope_id.ok_or_else(|| CoreError::Internal(format!("{kind} listing requires an account scope")))
}

fn mismatched(filter: &FilterDescriptor, kind: ResourceKind) -> ! {
    panic!(
        "filter descriptor for {} reached the {kind} executor",
        filter.kind()
    )
}

#[async_trait]
impl ListExecutor<Accounts> for PgStore {
    type Item = Account;

    async fn execute_list(
        &self,
        _scope_id: Option<DbId>,
        query: &ListQuery,
        filter: &FilterDescriptor,
    ) -> Result<ResultPage<Account>, CoreError> {
        if !matches!(filter.filter(), ResourceFilter::Accounts) {
            mismatched(filter, ResourceKind::Accounts);
        }
        let order = order_by::<Accounts>(query, AccountRepo::sort_column, "id")?;

        let items = AccountRepo::list(&self.pool, &order, query.count, query.start)
            .await
            .map_err(store_error)?;
        let total = AccountRepo::count(&self.pool).await.map_err(store_error)?;

        Ok(ResultPage::new(items, total))
    }
}

#[async_trait]
impl ListExecutor<Videos> for PgStore {
    type Item = Video;

    async fn execute_list(
        &self,
        scope_id: Option<DbId>,
        query: &ListQuery,
        filter: &FilterDescriptor,
    ) -> Result<ResultPage<Video>, CoreError> {
        let ResourceFilter::Videos(video_filter) = filter.filter() else {
            mismatched(filter, ResourceKind::Videos);
        };
        let account_id = owner_scope(scope_id, ResourceKind::Videos)?;
        let order = order_by::<Videos>(query, VideoRepo::sort_column, "v.id")?;
        let visibility = filter.visibility();

        let items = VideoRepo::list_for_account(
            &self.pool,
            account_id,
            visibility,
            video_filter,
            &order,
            query.count,
            query.start,
        )
        .await
        .map_err(store_error)?;
        let total = VideoRepo::count_for_account(&self.pool, account_id, visibility, video_filter)
            .await
            .map_err(store_error)?;

        Ok(ResultPage::new(items, total))
    }
}

#[async_trait]
impl ListExecutor<Channels> for PgStore {
    type Item = Channel;

    async fn execute_list(
        &self,
        scope_id: Option<DbId>,
        query: &ListQuery,
        filter: &FilterDescriptor,
    ) -> Result<ResultPage<Channel>, CoreError> {
        let ResourceFilter::Channels(channel_filter) = filter.filter() else {
            mismatched(filter, ResourceKind::Channels);
        };
        let account_id = owner_scope(scope_id, ResourceKind::Channels)?;
        let order = order_by::<Channels>(query, ChannelRepo::sort_column, "c.id")?;

        let items = ChannelRepo::list_for_account(
            &self.pool,
            account_id,
            channel_filter,
            &order,
            query.count,
            query.start,
        )
        .await
        .map_err(store_error)?;
        let total = ChannelRepo::count_for_account(&self.pool, account_id, channel_filter)
            .await
            .map_err(store_error)?;

        Ok(ResultPage::new(items, total))
    }
}

#[async_trait]
impl ListExecutor<Playlists> for PgStore {
    type Item = Playlist;

    async fn execute_list(
        &self,
        scope_id: Option<DbId>,
        query: &ListQuery,
        filter: &FilterDescriptor,
    ) -> Result<ResultPage<Playlist>, CoreError> {
        let ResourceFilter::Playlists(playlist_filter) = filter.filter() else {
            mismatched(filter, ResourceKind::Playlists);
        };
        let account_id = owner_scope(scope_id, ResourceKind::Playlists)?;
        let order = order_by::<Playlists>(query, PlaylistRepo::sort_column, "p.id")?;
        let visibility = filter.visibility();

        let items = PlaylistRepo::list_for_account(
            &self.pool,
            account_id,
            visibility,
            playlist_filter,
            &order,
            query.count,
            query.start,
        )
        .await
        .map_err(store_error)?;
        let total =
            PlaylistRepo::count_for_account(&self.pool, account_id, visibility, playlist_filter)
                .await
                .map_err(store_error)?;

        Ok(ResultPage::new(items, total))
    }
}

#[async_trait]
impl ListExecutor<Ratings> for PgStore {
    type Item = Rating;

    async fn execute_list(
        &self,
        scope_id: Option<DbId>,
        query: &ListQuery,
        filter: &FilterDescriptor,
    ) -> Result<ResultPage<Rating>, CoreError> {
        let ResourceFilter::Ratings(rating_filter) = filter.filter() else {
            mismatched(filter, ResourceKind::Ratings);
        };
        let account_id = owner_scope(scope_id, ResourceKind::Ratings)?;
        let order = order_by::<Ratings>(query, RatingRepo::sort_column, "r.id")?;

        let items = RatingRepo::list_for_account(
            &self.pool,
            account_id,
            rating_filter,
            &order,
            query.count,
            query.start,
        )
        .await
        .map_err(store_error)?;
        let total = RatingRepo::count_for_account(&self.pool, account_id, rating_filter)
            .await
            .map_err(store_error)?;

        Ok(ResultPage::new(items, total))
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn is_healthy(&self) -> bool {
        crate::health_check(&self.pool).await.is_ok()
    }
}

#[async_trait]
impl AccountSource for PgStore {
    async fn find_account_by_handle(
        &self,
        handle: &AccountHandle,
    ) -> Result<Option<Account>, CoreError> {
        AccountRepo::find_by_name_and_host(&self.pool, &handle.name, handle.host.as_deref())
            .await
            .map_err(store_error)
    }

    async fn nsfw_policy_for(&self, account_id: DbId) -> Result<Option<NsfwPolicy>, CoreError> {
        let raw = AccountRepo::find_nsfw_policy(&self.pool, account_id)
            .await
            .map_err(store_error)?;

        // The column is CHECK-constrained; an unknown value means the schema
        // and this build disagree, so fall back to the instance default.
        Ok(raw.and_then(|value| match value.parse() {
            Ok(policy) => Some(policy),
            Err(e) => {
                tracing::warn!(account_id, value = %value, error = %e, "Unknown NSFW policy");
                None
            }
        }))
    }
}

#[async_trait]
impl PlaylistSource for PgStore {
    async fn find_playlist_by_uuid(&self, uuid: Uuid) -> Result<Option<Playlist>, CoreError> {
        PlaylistRepo::find_by_uuid(&self.pool, uuid)
            .await
            .map_err(store_error)
    }
}
