use std::time::Duration;

use fedtube_core::filters::{NsfwPolicy, RemoteUriSearchPolicy};
use fedtube_core::pagination::{PageDefaults, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `9000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background tasks after the listener closes
    /// (default: `10`).
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub listing: ListingConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `9000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `10`                       |
    ///
    /// See [`JwtConfig::from_env`] and [`ListingConfig::from_env`] for the
    /// remaining variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "9000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            listing: ListingConfig::from_env(),
        }
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Where actor refresh jobs are submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobQueueBackend {
    /// Rows in the `jobs` table.
    Postgres,
    /// Bounded in-process channel drained by a log sink.
    Memory,
}

/// Instance settings that shape listing responses.
#[derive(Debug, Clone)]
pub struct ListingConfig {
    /// Host name of this instance; `name@<local_host>` handles resolve to
    /// local accounts.
    pub local_host: String,
    pub page: PageDefaults,
    pub actor_refresh_interval: Duration,
    pub instance_nsfw: NsfwPolicy,
    pub remote_uri_search: RemoteUriSearchPolicy,
    pub job_queue: JobQueueBackend,
    pub job_queue_capacity: usize,
}

impl ListingConfig {
    /// | Env Var                       | Default       |
    /// |-------------------------------|---------------|
    /// | `LOCAL_HOST`                  | `localhost`   |
    /// | `PAGE_SIZE_DEFAULT`           | `15`          |
    /// | `PAGE_SIZE_MAX`               | `100`         |
    /// | `ACTOR_REFRESH_INTERVAL_SECS` | `172800`      |
    /// | `INSTANCE_NSFW_POLICY`        | `display`     |
    /// | `SEARCH_REMOTE_URI_USERS`     | `true`        |
    /// | `SEARCH_REMOTE_URI_ANONYMOUS` | `false`       |
    /// | `JOB_QUEUE_BACKEND`           | `postgres`    |
    /// | `JOB_QUEUE_CAPACITY`          | `1024`        |
    ///
    /// # Panics
    ///
    /// Panics on unparsable values, or if `PAGE_SIZE_DEFAULT` exceeds
    /// `PAGE_SIZE_MAX`.
    pub fn from_env() -> Self {
        let local_host = std::env::var("LOCAL_HOST")
            .unwrap_or_else(|_| "localhost".into())
            .to_lowercase();

        let page_size: i64 = env_or("PAGE_SIZE_DEFAULT", DEFAULT_PAGE_SIZE)
            .parse()
            .expect("PAGE_SIZE_DEFAULT must be a valid i64");
        let max_page_size: i64 = env_or("PAGE_SIZE_MAX", MAX_PAGE_SIZE)
            .parse()
            .expect("PAGE_SIZE_MAX must be a valid i64");
        assert!(
            page_size >= 1 && page_size <= max_page_size,
            "PAGE_SIZE_DEFAULT must be between 1 and PAGE_SIZE_MAX"
        );

        let refresh_secs: u64 = env_or("ACTOR_REFRESH_INTERVAL_SECS", 172_800)
            .parse()
            .expect("ACTOR_REFRESH_INTERVAL_SECS must be a valid u64");

        let instance_nsfw: NsfwPolicy = env_or("INSTANCE_NSFW_POLICY", "display")
            .parse()
            .expect("INSTANCE_NSFW_POLICY must be display, blur or do_not_list");

        let remote_uri_search = RemoteUriSearchPolicy {
            users: env_or("SEARCH_REMOTE_URI_USERS", true)
                .parse()
                .expect("SEARCH_REMOTE_URI_USERS must be true or false"),
            anonymous: env_or("SEARCH_REMOTE_URI_ANONYMOUS", false)
                .parse()
                .expect("SEARCH_REMOTE_URI_ANONYMOUS must be true or false"),
        };

        let job_queue = match env_or("JOB_QUEUE_BACKEND", "postgres").as_str() {
            "postgres" => JobQueueBackend::Postgres,
            "memory" => JobQueueBackend::Memory,
            other => panic!("JOB_QUEUE_BACKEND must be postgres or memory, got '{other}'"),
        };

        let job_queue_capacity: usize = env_or("JOB_QUEUE_CAPACITY", 1024)
            .parse()
            .expect("JOB_QUEUE_CAPACITY must be a valid usize");

        Self {
            local_host,
            page: PageDefaults {
                page_size,
                max_page_size,
            },
            actor_refresh_interval: Duration::from_secs(refresh_secs),
            instance_nsfw,
            remote_uri_search,
            job_queue,
            job_queue_capacity,
        }
    }
}

fn env_or(key: &str, default: impl ToString) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
