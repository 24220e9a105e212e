//! Video entity.

use fedtube_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A video as listed under its owning account.
///
/// `privacy` holds the raw column value (`public`, `unlisted`, `private`,
/// `internal`). `tags` keep the case they were published with; filters
/// compare them case-insensitively.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub uuid: Uuid,
    pub channel_id: DbId,
    pub account_id: DbId,
    pub name: String,
    pub category: Option<i32>,
    pub licence: Option<i32>,
    pub language: Option<String>,
    pub nsfw: bool,
    pub privacy: String,
    pub is_local: bool,
    pub duration: i32,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub tags: Vec<String>,
    pub published_at: Timestamp,
    pub created_at: Timestamp,
}
