use axum::routing::get;
use axum::Router;

use crate::handlers::playlists;
use crate::state::AppState;

/// Routes mounted at `/video-playlists`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{uuid}", get(playlists::get_playlist))
}
