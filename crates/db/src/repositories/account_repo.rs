//! Repository for the `accounts` and `users` tables.

use fedtube_core::types::DbId;
use sqlx::PgPool;

use super::clause::OrderBy;
use crate::models::account::Account;

/// Column list for `accounts` SELECT queries.
const COLUMNS: &str = "\
    id, name, display_name, description, host, actor_url, \
    actor_refreshed_at, created_at, updated_at";

/// Provides lookup and list queries over accounts.
pub struct AccountRepo;

impl AccountRepo {
    pub fn sort_column(field: &str) -> Option<&'static str> {
        match field {
            "id" => Some("id"),
            "name" => Some("name"),
            "createdAt" => Some("created_at"),
            _ => None,
        }
    }

    /// Find an account by name and host (`None` for local accounts).
    pub async fn find_by_name_and_host(
        pool: &PgPool,
        name: &str,
        host: Option<&str>,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM accounts \
             WHERE name = $1 AND host IS NOT DISTINCT FROM $2"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(name)
            .bind(host)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        order: &OrderBy,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Account>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM accounts {} LIMIT $1 OFFSET $2",
            order.as_sql()
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM accounts")
            .fetch_one(pool)
            .await
    }

    /// NSFW policy of the local user owning `account_id`, if any.
    pub async fn find_nsfw_policy(
        pool: &PgPool,
        account_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT nsfw_policy FROM users WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(pool)
            .await
    }
}
