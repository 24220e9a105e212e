//! Job envelope submitted to a [`JobQueue`](crate::queue::JobQueue).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// JobKind
// ---------------------------------------------------------------------------

/// The worker family a job is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobKind {
    /// Re-fetches federated objects (actors, videos) from their origin.
    ActivitypubRefresher,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActivitypubRefresher => "activitypub-refresher",
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// JobRequest
// ---------------------------------------------------------------------------

/// A job waiting to be queued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    pub kind: JobKind,
    pub payload: serde_json::Value,
    pub requested_at: DateTime<Utc>,
}

impl JobRequest {
    pub fn new(kind: JobKind, payload: serde_json::Value) -> Self {
        Self {
            kind,
            payload,
            requested_at: Utc::now(),
        }
    }

    /// Refresh the actor published at `actor_url`.
    pub fn actor_refresh(actor_url: impl Into<String>) -> Self {
        Self::new(
            JobKind::ActivitypubRefresher,
            serde_json::json!({
                "type": "actor",
                "url": actor_url.into(),
            }),
        )
    }

    /// The `url` field of the payload, if it has one.
    pub fn target_url(&self) -> Option<&str> {
        self.payload.get("url").and_then(serde_json::Value::as_str)
    }
}

/// Receipt for an accepted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobHandle {
    /// Persisted under this `jobs.id`.
    Stored(i64),
    /// Accepted by an in-process queue.
    Queued,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
