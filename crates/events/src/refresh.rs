//! Fire-and-forget refresh of stale remote actors.
//!
//! [`FreshnessMonitor::maybe_refresh`] is called on every account read. When
//! the account is remote and its cached actor metadata is older than the
//! threshold, a refresh job is submitted on a detached task. The caller
//! never waits on the submission and never sees its outcome; failures are
//! logged with the actor URL and dropped.
//!
//! There is no in-flight deduplication: concurrent reads of the same stale
//! account may each submit a job. A read that follows a failed submission
//! finds the account still stale and submits again.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use fedtube_core::account::{FederatedActor, ACTOR_REFRESH_INTERVAL};
use tokio::task::JoinHandle;

use crate::job::JobRequest;
use crate::queue::JobQueue;

#[derive(Clone)]
pub struct FreshnessMonitor {
    queue: Arc<dyn JobQueue>,
    threshold: Duration,
}

impl FreshnessMonitor {
    pub fn new(queue: Arc<dyn JobQueue>, threshold: Duration) -> Self {
        Self { queue, threshold }
    }

    /// A monitor using the default two-day refresh interval.
    pub fn with_default_interval(queue: Arc<dyn JobQueue>) -> Self {
        Self::new(queue, ACTOR_REFRESH_INTERVAL)
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Schedule a refresh of `actor` if it is outdated.
    ///
    /// Returns the detached submission task, or `None` when no refresh is
    /// needed. Dropping the handle does not cancel the task.
    pub fn maybe_refresh<A>(&self, actor: &A) -> Option<JoinHandle<()>>
    where
        A: FederatedActor + ?Sized,
    {
        if !actor.is_outdated(Utc::now(), self.threshold) {
            return None;
        }

        let queue = Arc::clone(&self.queue);
        let actor_url = actor.actor_url().to_string();

        Some(tokio::spawn(async move {
            match queue.submit(JobRequest::actor_refresh(actor_url.clone())).await {
                Ok(handle) => {
                    tracing::debug!(actor_url = %actor_url, ?handle, "Actor refresh scheduled");
                }
                Err(e) => {
                    tracing::warn!(
                        actor_url = %actor_url,
                        error = %e,
                        "Failed to schedule actor refresh"
                    );
                }
            }
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
