//! Background job submission for fedtube.
//!
//! - [`JobRequest`] / [`JobKind`]: the job envelope handed to a queue.
//! - [`JobQueue`]: the submission seam, with an in-process
//!   [`ChannelJobQueue`] and the durable [`PgJobQueue`].
//! - [`FreshnessMonitor`]: schedules actor refresh jobs for stale remote
//!   accounts without blocking the read that noticed them.

pub mod job;
pub mod persistence;
pub mod queue;
pub mod refresh;

pub use job::{JobHandle, JobKind, JobRequest};
pub use persistence::PgJobQueue;
pub use queue::{ChannelJobQueue, JobQueue, JobQueueError};
pub use refresh::FreshnessMonitor;
