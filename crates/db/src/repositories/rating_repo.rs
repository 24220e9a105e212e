//! Repository for the `account_video_rates` table.

use fedtube_core::filters::RatingFilter;
use fedtube_core::types::DbId;
use sqlx::PgPool;

use super::clause::{bind_values, bind_values_scalar, BindValue, OrderBy, WhereClause};
use crate::models::rating::Rating;

const COLUMNS: &str = "\
    r.id, r.video_id, v.uuid AS video_uuid, v.name AS video_name, \
    r.rating, r.created_at";

/// Provides list queries over the ratings an account has left.
pub struct RatingRepo;

impl RatingRepo {
    pub fn sort_column(field: &str) -> Option<&'static str> {
        match field {
            "createdAt" => Some("r.created_at"),
            _ => None,
        }
    }

    pub async fn list_for_account(
        pool: &PgPool,
        account_id: DbId,
        filter: &RatingFilter,
        order: &OrderBy,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Rating>, sqlx::Error> {
        let clause = build_rating_filter(account_id, filter);
        let idx = clause.next_index();

        let query = format!(
            "SELECT {COLUMNS} FROM account_video_rates r \
             JOIN videos v ON v.id = r.video_id \
             {} {} LIMIT ${idx} OFFSET ${}",
            clause.to_sql(),
            order.as_sql(),
            idx + 1
        );

        bind_values(sqlx::query_as::<_, Rating>(&query), clause.binds())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_account(
        pool: &PgPool,
        account_id: DbId,
        filter: &RatingFilter,
    ) -> Result<i64, sqlx::Error> {
        let clause = build_rating_filter(account_id, filter);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM account_video_rates r {}",
            clause.to_sql()
        );

        bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), clause.binds())
            .fetch_one(pool)
            .await
    }
}

fn build_rating_filter(account_id: DbId, filter: &RatingFilter) -> WhereClause {
    let mut clause = WhereClause::new();
    clause.bind(BindValue::BigInt(account_id), |p| format!("r.account_id = {p}"));

    if let Some(rating) = filter.rating {
        clause.bind(BindValue::Text(rating.as_str().to_string()), |p| {
            format!("r.rating = {p}")
        });
    }

    clause
}
