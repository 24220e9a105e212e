//! Repository for the `video_channels` table.

use fedtube_core::filters::ChannelFilter;
use fedtube_core::types::DbId;
use sqlx::PgPool;

use super::clause::{bind_values, bind_values_scalar, like_pattern, BindValue, OrderBy, WhereClause};
use crate::models::channel::Channel;

/// Column list for `video_channels` SELECT queries (aliased as `c`).
const COLUMNS: &str = "\
    c.id, c.account_id, c.name, c.display_name, c.description, \
    c.created_at, c.updated_at";

/// Provides list queries over an account's channels.
pub struct ChannelRepo;

impl ChannelRepo {
    pub fn sort_column(field: &str) -> Option<&'static str> {
        match field {
            "id" => Some("c.id"),
            "name" => Some("c.name"),
            "updatedAt" => Some("c.updated_at"),
            "createdAt" => Some("c.created_at"),
            _ => None,
        }
    }

    pub async fn list_for_account(
        pool: &PgPool,
        account_id: DbId,
        filter: &ChannelFilter,
        order: &OrderBy,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Channel>, sqlx::Error> {
        let clause = build_channel_filter(account_id, filter);
        let idx = clause.next_index();

        let query = format!(
            "SELECT {COLUMNS} FROM video_channels c {} {} LIMIT ${idx} OFFSET ${}",
            clause.to_sql(),
            order.as_sql(),
            idx + 1
        );

        bind_values(sqlx::query_as::<_, Channel>(&query), clause.binds())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_account(
        pool: &PgPool,
        account_id: DbId,
        filter: &ChannelFilter,
    ) -> Result<i64, sqlx::Error> {
        let clause = build_channel_filter(account_id, filter);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM video_channels c {}",
            clause.to_sql()
        );

        bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), clause.binds())
            .fetch_one(pool)
            .await
    }
}

fn build_channel_filter(account_id: DbId, filter: &ChannelFilter) -> WhereClause {
    let mut clause = WhereClause::new();
    clause.bind(BindValue::BigInt(account_id), |p| format!("c.account_id = {p}"));

    if let Some(search) = &filter.search {
        clause.bind(BindValue::Text(like_pattern(search)), |p| {
            format!("(c.name ILIKE {p} OR c.display_name ILIKE {p})")
        });
    }

    clause
}
