use std::sync::Arc;

use fedtube_db::store::Store;
use fedtube_events::FreshnessMonitor;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Query executor and account/playlist lookups.
    pub store: Arc<dyn Store>,
    /// Schedules refreshes of stale remote actors on account reads.
    pub freshness: FreshnessMonitor,
    pub config: Arc<ServerConfig>,
}
