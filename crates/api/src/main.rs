use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use fedtube_api::config::{JobQueueBackend, ServerConfig};
use fedtube_api::router::build_app_router;
use fedtube_api::state::AppState;
use fedtube_db::store::PgStore;
use fedtube_events::{ChannelJobQueue, FreshnessMonitor, JobQueue, PgJobQueue};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fedtube_api=debug,fedtube_events=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        local_host = %config.listing.local_host,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = fedtube_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    fedtube_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    fedtube_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Job queue ---
    let mut sink_handle = None;
    let job_queue: Arc<dyn JobQueue> = match config.listing.job_queue {
        JobQueueBackend::Postgres => Arc::new(PgJobQueue::new(pool.clone())),
        JobQueueBackend::Memory => {
            let (queue, receiver) = ChannelJobQueue::new(config.listing.job_queue_capacity);
            sink_handle = Some(tokio::spawn(ChannelJobQueue::run_log_sink(receiver)));
            Arc::new(queue)
        }
    };
    tracing::info!(backend = ?config.listing.job_queue, "Job queue ready");

    let freshness = FreshnessMonitor::new(job_queue, config.listing.actor_refresh_interval);

    // --- App state ---
    let state = AppState {
        store: Arc::new(PgStore::new(pool.clone())),
        freshness,
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // The router (and with it the last queue sender) is gone, so the sink
    // drains what is buffered and exits.
    if let Some(handle) = sink_handle {
        let timeout = Duration::from_secs(config.shutdown_timeout_secs);
        if tokio::time::timeout(timeout, handle).await.is_err() {
            tracing::warn!("In-memory job queue did not drain before shutdown timeout");
        }
    }

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
