//! Direct-link playlist reads.

use axum::extract::{Path, State};
use axum::Json;
use fedtube_core::error::CoreError;
use fedtube_core::visibility::{resolve_visibility, Privacy, VisibilityPolicy};
use fedtube_db::models::playlist::Playlist;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::Requester;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /video-playlists/{uuid}
///
/// Public and unlisted playlists are readable by anyone holding the link;
/// private ones only by their owner. A playlist outside the caller's scope
/// is reported as not found.
pub async fn get_playlist(
    State(state): State<AppState>,
    Requester(requester): Requester,
    Path(uuid): Path<Uuid>,
) -> AppResult<Json<DataResponse<Playlist>>> {
    let not_found = || CoreError::NotFound {
        entity: "Playlist",
        key: uuid.to_string(),
    };

    let playlist = state
        .store
        .find_playlist_by_uuid(uuid)
        .await?
        .ok_or_else(not_found)?;

    let scope = resolve_visibility(
        playlist.account_id,
        requester.as_ref(),
        VisibilityPolicy::DirectLink,
    );
    let privacy: Privacy = playlist.privacy.parse()?;

    if !scope.includes(privacy) {
        return Err(not_found().into());
    }

    Ok(Json(DataResponse { data: playlist }))
}
