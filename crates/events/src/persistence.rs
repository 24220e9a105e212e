//! Durable job queue on the `jobs` table.
//!
//! [`PgJobQueue`] inserts each submitted job as a `pending` row; a worker
//! outside this service picks them up.

use async_trait::async_trait;
use fedtube_db::repositories::JobRepo;
use fedtube_db::DbPool;

use crate::job::{JobHandle, JobRequest};
use crate::queue::{JobQueue, JobQueueError};

#[derive(Clone)]
pub struct PgJobQueue {
    pool: DbPool,
}

impl PgJobQueue {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobQueue for PgJobQueue {
    async fn submit(&self, job: JobRequest) -> Result<JobHandle, JobQueueError> {
        let id = JobRepo::insert(&self.pool, job.kind.as_str(), &job.payload).await?;
        tracing::debug!(job_id = id, kind = %job.kind, "Job stored");
        Ok(JobHandle::Stored(id))
    }
}
