//! Repository for the `jobs` table.

use fedtube_core::types::DbId;
use sqlx::PgPool;

use crate::models::job::Job;

const COLUMNS: &str = "id, kind, payload, state, created_at";

/// Provides insert and lookup operations for queued jobs.
pub struct JobRepo;

impl JobRepo {
    /// Queue a job in the `pending` state, returning its id.
    pub async fn insert(
        pool: &PgPool,
        kind: &str,
        payload: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("INSERT INTO jobs (kind, payload) VALUES ($1, $2) RETURNING id")
            .bind(kind)
            .bind(payload)
            .fetch_one(pool)
            .await
    }

    /// Pending jobs of the given kind, oldest first.
    pub async fn list_pending(pool: &PgPool, kind: &str) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs WHERE kind = $1 AND state = 'pending' ORDER BY id ASC"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(kind)
            .fetch_all(pool)
            .await
    }
}
