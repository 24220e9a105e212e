//! Repository for the `video_playlists` table.

use fedtube_core::filters::PlaylistFilter;
use fedtube_core::types::DbId;
use fedtube_core::visibility::VisibilityScope;
use sqlx::PgPool;
use uuid::Uuid;

use super::clause::{bind_values, bind_values_scalar, like_pattern, BindValue, OrderBy, WhereClause};
use crate::models::playlist::Playlist;

/// Column list for `video_playlists` SELECT queries (aliased as `p`).
const COLUMNS: &str = "\
    p.id, p.uuid, p.account_id, p.channel_id, p.display_name, p.description, \
    p.privacy, p.playlist_type, \
    (SELECT COUNT(*) FROM video_playlist_elements e WHERE e.playlist_id = p.id)::BIGINT \
        AS videos_length, \
    p.created_at, p.updated_at";

/// Provides list and lookup queries over playlists.
pub struct PlaylistRepo;

impl PlaylistRepo {
    pub fn sort_column(field: &str) -> Option<&'static str> {
        match field {
            "id" => Some("p.id"),
            "displayName" => Some("p.display_name"),
            "createdAt" => Some("p.created_at"),
            "updatedAt" => Some("p.updated_at"),
            _ => None,
        }
    }

    /// Find a playlist by its public UUID, regardless of privacy.
    pub async fn find_by_uuid(pool: &PgPool, uuid: Uuid) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM video_playlists p WHERE p.uuid = $1");
        sqlx::query_as::<_, Playlist>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_account(
        pool: &PgPool,
        account_id: DbId,
        visibility: VisibilityScope,
        filter: &PlaylistFilter,
        order: &OrderBy,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Playlist>, sqlx::Error> {
        let clause = build_playlist_filter(account_id, visibility, filter);
        let idx = clause.next_index();

        let query = format!(
            "SELECT {COLUMNS} FROM video_playlists p {} {} LIMIT ${idx} OFFSET ${}",
            clause.to_sql(),
            order.as_sql(),
            idx + 1
        );

        bind_values(sqlx::query_as::<_, Playlist>(&query), clause.binds())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_account(
        pool: &PgPool,
        account_id: DbId,
        visibility: VisibilityScope,
        filter: &PlaylistFilter,
    ) -> Result<i64, sqlx::Error> {
        let clause = build_playlist_filter(account_id, visibility, filter);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM video_playlists p {}",
            clause.to_sql()
        );

        bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), clause.binds())
            .fetch_one(pool)
            .await
    }
}

fn build_playlist_filter(
    account_id: DbId,
    visibility: VisibilityScope,
    filter: &PlaylistFilter,
) -> WhereClause {
    let mut clause = WhereClause::new();
    clause.bind(BindValue::BigInt(account_id), |p| format!("p.account_id = {p}"));

    // Private and unlisted playlists are listed for the owner only.
    if !visibility.includes_private_and_unlisted() {
        clause.push("p.privacy = 'public'");
    }

    if let Some(playlist_type) = filter.playlist_type {
        clause.bind(BindValue::Text(playlist_type.as_str().to_string()), |p| {
            format!("p.playlist_type = {p}")
        });
    }

    if let Some(search) = &filter.search {
        clause.bind(BindValue::Text(like_pattern(search)), |p| {
            format!("p.display_name ILIKE {p}")
        });
    }

    clause
}
