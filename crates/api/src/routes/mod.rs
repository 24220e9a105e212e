pub mod accounts;
pub mod health;
pub mod playlists;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /accounts                                  list accounts
/// /accounts/{handle}                         get account
/// /accounts/{handle}/videos                  list videos
/// /accounts/{handle}/video-channels          list channels
/// /accounts/{handle}/video-playlists         list playlists
/// /accounts/{handle}/ratings                 list ratings (owner only)
///
/// /video-playlists/{uuid}                    get playlist
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/accounts", accounts::router())
        .nest("/video-playlists", playlists::router())
}
