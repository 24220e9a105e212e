//! The job submission seam.
//!
//! Submitting only hands a job over; it never waits for the job to run.
//! [`ChannelJobQueue`] is the in-process implementation backed by a bounded
//! `tokio::sync::mpsc` channel.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::job::{JobHandle, JobRequest};

/// Default buffer capacity for [`ChannelJobQueue`].
pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum JobQueueError {
    #[error("Job queue is full")]
    Full,

    #[error("Job queue is closed")]
    Closed,

    #[error("Job store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Accepts jobs for asynchronous execution.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn submit(&self, job: JobRequest) -> Result<JobHandle, JobQueueError>;
}

// ---------------------------------------------------------------------------
// ChannelJobQueue
// ---------------------------------------------------------------------------

/// In-process queue. Jobs are delivered to the receiver returned by
/// [`ChannelJobQueue::new`]; when its buffer is full new jobs are rejected
/// rather than waited on.
#[derive(Clone)]
pub struct ChannelJobQueue {
    sender: mpsc::Sender<JobRequest>,
}

impl ChannelJobQueue {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<JobRequest>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Drain `receiver` until every sender is dropped, logging each job.
    ///
    /// Used when no worker consumes the in-process queue.
    pub async fn run_log_sink(mut receiver: mpsc::Receiver<JobRequest>) {
        while let Some(job) = receiver.recv().await {
            tracing::info!(
                kind = %job.kind,
                url = job.target_url().unwrap_or_default(),
                "Job accepted by in-memory queue"
            );
        }
        tracing::info!("In-memory job queue closed");
    }
}

#[async_trait]
impl JobQueue for ChannelJobQueue {
    async fn submit(&self, job: JobRequest) -> Result<JobHandle, JobQueueError> {
        self.sender.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => JobQueueError::Full,
            mpsc::error::TrySendError::Closed(_) => JobQueueError::Closed,
        })?;
        Ok(JobHandle::Queued)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn submitted_jobs_reach_the_receiver() {
        let (queue, mut rx) = ChannelJobQueue::new(4);
        let handle = queue
            .submit(JobRequest::actor_refresh("https://remote.example/a/1"))
            .await
            .unwrap();

        assert_eq!(handle, JobHandle::Queued);
        let job = rx.recv().await.unwrap();
        assert_eq!(job.target_url(), Some("https://remote.example/a/1"));
    }

    #[tokio::test]
    async fn full_queue_rejects_instead_of_waiting() {
        let (queue, _rx) = ChannelJobQueue::new(1);
        queue
            .submit(JobRequest::actor_refresh("https://remote.example/a/1"))
            .await
            .unwrap();

        let err = queue
            .submit(JobRequest::actor_refresh("https://remote.example/a/2"))
            .await
            .unwrap_err();
        assert!(matches!(err, JobQueueError::Full));
    }

    #[tokio::test]
    async fn closed_queue_reports_closed() {
        let (queue, rx) = ChannelJobQueue::new(1);
        drop(rx);

        let err = queue
            .submit(JobRequest::actor_refresh("https://remote.example/a/1"))
            .await
            .unwrap_err();
        assert!(matches!(err, JobQueueError::Closed));
    }
}
