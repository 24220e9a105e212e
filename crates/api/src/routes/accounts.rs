use axum::routing::get;
use axum::Router;

use crate::handlers::accounts;
use crate::state::AppState;

/// Routes mounted at `/accounts`.
///
/// `{handle}` is `name` for local accounts or `name@host` for remote ones.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(accounts::list_accounts))
        .route("/{handle}", get(accounts::get_account))
        .route("/{handle}/videos", get(accounts::list_account_videos))
        .route("/{handle}/video-channels", get(accounts::list_account_channels))
        .route("/{handle}/video-playlists", get(accounts::list_account_playlists))
        .route("/{handle}/ratings", get(accounts::list_account_ratings))
}
