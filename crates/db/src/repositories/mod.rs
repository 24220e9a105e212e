//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub(crate) mod clause;

pub mod account_repo;
pub mod channel_repo;
pub mod job_repo;
pub mod playlist_repo;
pub mod rating_repo;
pub mod video_repo;

pub use account_repo::AccountRepo;
pub use channel_repo::ChannelRepo;
pub use clause::OrderBy;
pub use job_repo::JobRepo;
pub use playlist_repo::PlaylistRepo;
pub use rating_repo::RatingRepo;
pub use video_repo::VideoRepo;
