use fedtube_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One like/dislike left by an account, with a summary of the rated video.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rating {
    pub id: DbId,
    pub video_id: DbId,
    pub video_uuid: Uuid,
    pub video_name: String,
    pub rating: String,
    pub created_at: Timestamp,
}
