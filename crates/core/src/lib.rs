//! Fedtube domain core.
//!
//! Pure policy logic shared by the store, the job queue and the HTTP layer:
//! pagination and sort normalization, visibility scoping, filter
//! composition, the generic list service and the federated actor
//! freshness rules. This crate has no internal dependencies.

pub mod account;
pub mod error;
pub mod filters;
pub mod listing;
pub mod pagination;
pub mod resources;
pub mod roles;
pub mod types;
pub mod visibility;
