//! Background job rows.

use fedtube_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A queued job. Jobs are inserted here and executed elsewhere.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub kind: String,
    pub payload: serde_json::Value,
    pub state: String,
    pub created_at: Timestamp,
}
