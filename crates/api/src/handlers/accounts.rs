//! Handlers for account reads and the per-account listings.
//!
//! Every listing follows the same path: normalize paging, resolve the
//! account, resolve visibility, compose filters, then one
//! [`ListService::list`] call.

use axum::extract::{Path, State};
use axum::Json;
use fedtube_core::account::AccountHandle;
use fedtube_core::error::CoreError;
use fedtube_core::filters::{compose, RawFilters};
use fedtube_core::listing::ListService;
use fedtube_core::resources::{Accounts, Channels, Playlists, Ratings, Videos};
use fedtube_core::visibility::{require_owner, resolve_visibility, VisibilityPolicy, VisibilityScope};
use fedtube_db::models::account::Account;
use fedtube_db::models::channel::Channel;
use fedtube_db::models::playlist::Playlist;
use fedtube_db::models::rating::Rating;
use fedtube_db::models::video::Video;

use super::caller_capabilities;
use crate::error::AppResult;
use crate::middleware::auth::Requester;
use crate::query::{
    ChannelListParams, ListParams, PageParams, PlaylistListParams, RatingListParams,
    VideoListParams,
};
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Look up the account named by a `name` or `name@host` path segment.
async fn resolve_account(state: &AppState, raw_handle: &str) -> AppResult<Account> {
    let handle = AccountHandle::parse(raw_handle, &state.config.listing.local_host)?;

    let account = state
        .store
        .find_account_by_handle(&handle)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "Account",
            key: handle.to_string(),
        })?;

    Ok(account)
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// GET /accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    Requester(requester): Requester,
    ListParams(params): ListParams<PageParams>,
) -> AppResult<Json<PageResponse<Account>>> {
    let query = params.to_query::<Accounts>(state.config.listing.page)?;
    let caller = caller_capabilities(&state, requester.as_ref()).await?;
    let filter = compose(RawFilters::Accounts, VisibilityScope::PublicOnly, &caller)?;

    let page = ListService::list::<Accounts, _>(state.store.as_ref(), None, &query, &filter).await?;

    Ok(Json(page.into()))
}

/// GET /accounts/{handle}
///
/// A stale remote account is returned as cached; a refresh is scheduled in
/// the background and its outcome never affects this response.
pub async fn get_account(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> AppResult<Json<DataResponse<Account>>> {
    let account = resolve_account(&state, &handle).await?;

    if state.freshness.maybe_refresh(&account).is_some() {
        tracing::debug!(account_id = account.id, "Stale actor, refresh scheduled");
    }

    Ok(Json(DataResponse { data: account }))
}

// ---------------------------------------------------------------------------
// Per-account listings
// ---------------------------------------------------------------------------

/// GET /accounts/{handle}/videos
pub async fn list_account_videos(
    State(state): State<AppState>,
    Requester(requester): Requester,
    Path(handle): Path<String>,
    ListParams(params): ListParams<VideoListParams>,
) -> AppResult<Json<PageResponse<Video>>> {
    let query = params.page().to_query::<Videos>(state.config.listing.page)?;
    let account = resolve_account(&state, &handle).await?;

    let scope = resolve_visibility(account.id, requester.as_ref(), VisibilityPolicy::Listing);
    let caller = caller_capabilities(&state, requester.as_ref()).await?;
    let filter = compose(RawFilters::Videos(params.into_filters()?), scope, &caller)?;

    let page =
        ListService::list::<Videos, _>(state.store.as_ref(), Some(account.id), &query, &filter)
            .await?;

    Ok(Json(page.into()))
}

/// GET /accounts/{handle}/video-channels
pub async fn list_account_channels(
    State(state): State<AppState>,
    Requester(requester): Requester,
    Path(handle): Path<String>,
    ListParams(params): ListParams<ChannelListParams>,
) -> AppResult<Json<PageResponse<Channel>>> {
    let query = params.page().to_query::<Channels>(state.config.listing.page)?;
    let account = resolve_account(&state, &handle).await?;

    let scope = resolve_visibility(account.id, requester.as_ref(), VisibilityPolicy::Listing);
    let caller = caller_capabilities(&state, requester.as_ref()).await?;
    let filter = compose(RawFilters::Channels(params.into_filters()), scope, &caller)?;

    let page =
        ListService::list::<Channels, _>(state.store.as_ref(), Some(account.id), &query, &filter)
            .await?;

    Ok(Json(page.into()))
}

/// GET /accounts/{handle}/video-playlists
///
/// Private and unlisted playlists are included only for the owner.
pub async fn list_account_playlists(
    State(state): State<AppState>,
    Requester(requester): Requester,
    Path(handle): Path<String>,
    ListParams(params): ListParams<PlaylistListParams>,
) -> AppResult<Json<PageResponse<Playlist>>> {
    let query = params.page().to_query::<Playlists>(state.config.listing.page)?;
    let account = resolve_account(&state, &handle).await?;

    let scope = resolve_visibility(account.id, requester.as_ref(), VisibilityPolicy::Listing);
    let caller = caller_capabilities(&state, requester.as_ref()).await?;
    let filter = compose(RawFilters::Playlists(params.into_filters()), scope, &caller)?;

    let page =
        ListService::list::<Playlists, _>(state.store.as_ref(), Some(account.id), &query, &filter)
            .await?;

    Ok(Json(page.into()))
}

/// GET /accounts/{handle}/ratings
///
/// Owner only: 401 for anonymous callers, 403 for other accounts.
pub async fn list_account_ratings(
    State(state): State<AppState>,
    Requester(requester): Requester,
    Path(handle): Path<String>,
    ListParams(params): ListParams<RatingListParams>,
) -> AppResult<Json<PageResponse<Rating>>> {
    let query = params.page().to_query::<Ratings>(state.config.listing.page)?;
    let account = resolve_account(&state, &handle).await?;

    let owner = require_owner(account.id, requester.as_ref())?;
    let caller = caller_capabilities(&state, Some(owner)).await?;
    let filter = compose(
        RawFilters::Ratings(params.into_filters()),
        VisibilityScope::All,
        &caller,
    )?;

    let page =
        ListService::list::<Ratings, _>(state.store.as_ref(), Some(account.id), &query, &filter)
            .await?;

    Ok(Json(page.into()))
}
