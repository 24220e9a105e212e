use fedtube_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A video playlist. `videos_length` is computed from its elements.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Playlist {
    pub id: DbId,
    pub uuid: Uuid,
    pub account_id: DbId,
    pub channel_id: Option<DbId>,
    pub display_name: String,
    pub description: Option<String>,
    pub privacy: String,
    pub playlist_type: String,
    pub videos_length: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
