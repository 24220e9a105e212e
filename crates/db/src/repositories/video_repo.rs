//! Repository for the `videos` table.

use fedtube_core::filters::{NsfwFilter, VideoFilter};
use fedtube_core::types::DbId;
use fedtube_core::visibility::VisibilityScope;
use sqlx::PgPool;

use super::clause::{bind_values, bind_values_scalar, BindValue, OrderBy, WhereClause};
use crate::models::video::Video;

/// Column list for `videos` SELECT queries (aliased as `v`).
const COLUMNS: &str = "\
    v.id, v.uuid, v.channel_id, v.account_id, v.name, v.category, v.licence, \
    v.language, v.nsfw, v.privacy, v.is_local, v.duration, v.views, v.likes, \
    v.dislikes, v.tags, v.published_at, v.created_at";

/// `v.tags` with every element lower-cased.
const LOWER_TAGS: &str = "ARRAY(SELECT lower(t) FROM unnest(v.tags) AS t)";

/// Provides list queries over an account's videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Map a video sort field to its column.
    pub fn sort_column(field: &str) -> Option<&'static str> {
        match field {
            "name" => Some("v.name"),
            "duration" => Some("v.duration"),
            "createdAt" => Some("v.created_at"),
            "publishedAt" => Some("v.published_at"),
            "views" => Some("v.views"),
            "likes" => Some("v.likes"),
            _ => None,
        }
    }

    /// One page of an account's videos matching `filter` within `visibility`.
    pub async fn list_for_account(
        pool: &PgPool,
        account_id: DbId,
        visibility: VisibilityScope,
        filter: &VideoFilter,
        order: &OrderBy,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let clause = build_video_filter(account_id, visibility, filter);
        let idx = clause.next_index();

        let query = format!(
            "SELECT {COLUMNS} FROM videos v \
             JOIN accounts a ON a.id = v.account_id \
             {} {} LIMIT ${idx} OFFSET ${}",
            clause.to_sql(),
            order.as_sql(),
            idx + 1
        );

        bind_values(sqlx::query_as::<_, Video>(&query), clause.binds())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count all of an account's videos matching `filter` within `visibility`.
    pub async fn count_for_account(
        pool: &PgPool,
        account_id: DbId,
        visibility: VisibilityScope,
        filter: &VideoFilter,
    ) -> Result<i64, sqlx::Error> {
        let clause = build_video_filter(account_id, visibility, filter);

        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM videos v \
             JOIN accounts a ON a.id = v.account_id {}",
            clause.to_sql()
        );

        bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), clause.binds())
            .fetch_one(pool)
            .await
    }
}

fn build_video_filter(
    account_id: DbId,
    visibility: VisibilityScope,
    filter: &VideoFilter,
) -> WhereClause {
    let mut clause = WhereClause::new();

    clause.bind(BindValue::BigInt(account_id), |p| format!("v.account_id = {p}"));

    if let Some(privacies) = visibility.allowed_privacies() {
        let values = privacies.iter().map(|p| p.as_str().to_string()).collect();
        clause.bind(BindValue::TextArray(values), |p| format!("v.privacy = ANY({p})"));
    }

    if !filter.category_one_of.is_empty() {
        clause.bind(BindValue::IntArray(filter.category_one_of.clone()), |p| {
            format!("v.category = ANY({p})")
        });
    }

    if !filter.licence_one_of.is_empty() {
        clause.bind(BindValue::IntArray(filter.licence_one_of.clone()), |p| {
            format!("v.licence = ANY({p})")
        });
    }

    if !filter.language_one_of.is_empty() {
        clause.bind(BindValue::TextArray(filter.language_one_of.clone()), |p| {
            format!("v.language = ANY({p})")
        });
    }

    // Filter tags arrive lower-cased; stored tags keep their original case.
    if !filter.tags_one_of.is_empty() {
        clause.bind(BindValue::TextArray(filter.tags_one_of.clone()), |p| {
            format!("{LOWER_TAGS} && {p}::TEXT[]")
        });
    }

    if !filter.tags_all_of.is_empty() {
        clause.bind(BindValue::TextArray(filter.tags_all_of.clone()), |p| {
            format!("{LOWER_TAGS} @> {p}::TEXT[]")
        });
    }

    match filter.nsfw {
        NsfwFilter::Exclude => clause.push("v.nsfw = FALSE"),
        NsfwFilter::Only => clause.push("v.nsfw = TRUE"),
        NsfwFilter::Both => {}
    }

    if filter.local_only {
        clause.push("v.is_local = TRUE");
    }

    if filter.follower_scope.is_restricted() {
        clause.push(
            "(v.is_local = TRUE OR a.host IN \
             (SELECT f.host FROM instance_follows f WHERE f.state = 'accepted'))",
        );
    }

    clause
}
