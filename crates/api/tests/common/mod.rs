#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::Utc;
use fedtube_api::auth::jwt::{generate_access_token, JwtConfig};
use fedtube_api::config::{JobQueueBackend, ListingConfig, ServerConfig};
use fedtube_api::router::build_app_router;
use fedtube_api::state::AppState;
use fedtube_core::account::{AccountHandle, ACTOR_REFRESH_INTERVAL};
use fedtube_core::error::CoreError;
use fedtube_core::filters::{
    FilterDescriptor, NsfwPolicy, RemoteUriSearchPolicy, ResourceFilter, VideoFilter,
};
use fedtube_core::listing::{ListExecutor, ResultPage};
use fedtube_core::pagination::{ListQuery, PageDefaults};
use fedtube_core::resources::{Accounts, Channels, Playlists, Ratings, Videos};
use fedtube_core::types::DbId;
use fedtube_core::visibility::Privacy;
use fedtube_db::models::account::Account;
use fedtube_db::models::channel::Channel;
use fedtube_db::models::playlist::Playlist;
use fedtube_db::models::rating::Rating;
use fedtube_db::models::video::Video;
use fedtube_db::store::{AccountSource, PlaylistSource, StoreHealth};
use fedtube_events::{FreshnessMonitor, JobHandle, JobQueue, JobQueueError, JobRequest};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

pub const LOCAL_HOST: &str = "video.local";
pub const JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

pub const ALICE: DbId = 1;
pub const BOB: DbId = 2;
pub const CAROL: DbId = 3;
pub const MODERATOR: DbId = 50;

pub const UNLISTED_PLAYLIST: Uuid = Uuid::from_u128(0x2001);
pub const PRIVATE_PLAYLIST: Uuid = Uuid::from_u128(0x2002);

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        listing: ListingConfig {
            local_host: LOCAL_HOST.to_string(),
            page: PageDefaults::default(),
            actor_refresh_interval: ACTOR_REFRESH_INTERVAL,
            instance_nsfw: NsfwPolicy::Display,
            remote_uri_search: RemoteUriSearchPolicy {
                users: true,
                anonymous: false,
            },
            job_queue: JobQueueBackend::Memory,
            job_queue_capacity: 16,
        },
    }
}

pub fn token_for(account_id: DbId, role: &str) -> String {
    generate_access_token(account_id, role, &test_config().jwt).unwrap()
}

/// Build the application router over `store`, submitting refresh jobs to
/// `queue`.
pub fn build_test_app(store: MemoryStore, queue: Arc<dyn JobQueue>) -> Router {
    let config = test_config();

    let state = AppState {
        store: Arc::new(store),
        freshness: FreshnessMonitor::new(queue, config.listing.actor_refresh_interval),
        config: Arc::new(config.clone()),
    };

    build_app_router(state, &config)
}

/// The standard fixture with a queue that records submissions.
pub fn standard_app() -> (Router, Arc<RecordingQueue>) {
    let queue = Arc::new(RecordingQueue::default());
    let app = build_test_app(MemoryStore::standard(), queue.clone());
    (app, queue)
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_as(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `name` (or `displayName`) of each item in a `{data: [...]}` body.
pub fn names(json: &serde_json::Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| {
            item.get("name")
                .or_else(|| item.get("display_name"))
                .and_then(|v| v.as_str())
                .unwrap()
                .to_string()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Job queues
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingQueue {
    pub jobs: Mutex<Vec<JobRequest>>,
}

impl RecordingQueue {
    pub fn submitted(&self) -> Vec<JobRequest> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobQueue for RecordingQueue {
    async fn submit(&self, job: JobRequest) -> Result<JobHandle, JobQueueError> {
        self.jobs.lock().unwrap().push(job);
        Ok(JobHandle::Queued)
    }
}

/// Rejects every job, counting attempts.
#[derive(Default)]
pub struct FailingQueue {
    pub attempts: Mutex<usize>,
}

#[async_trait]
impl JobQueue for FailingQueue {
    async fn submit(&self, _job: JobRequest) -> Result<JobHandle, JobQueueError> {
        *self.attempts.lock().unwrap() += 1;
        Err(JobQueueError::Full)
    }
}

/// Give detached submission tasks a chance to run, then return.
pub async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// A [`Store`](fedtube_db::store::Store) over plain vectors, applying the
/// same visibility and filter rules as `PgStore`.
#[derive(Default)]
pub struct MemoryStore {
    pub accounts: Vec<Account>,
    pub channels: Vec<Channel>,
    pub videos: Vec<Video>,
    pub playlists: Vec<Playlist>,
    /// `(rater account id, rating)`.
    pub ratings: Vec<(DbId, Rating)>,
    pub nsfw_policies: HashMap<DbId, NsfwPolicy>,
    pub followed_hosts: Vec<String>,
    pub unavailable: bool,
}

fn account(id: DbId, name: &str, host: Option<&str>, refreshed_days_ago: i64) -> Account {
    let origin = host.unwrap_or(LOCAL_HOST);
    let created = Utc::now() - chrono::Duration::days(30) + chrono::Duration::minutes(id);
    Account {
        id,
        name: name.to_string(),
        display_name: name.to_string(),
        description: None,
        host: host.map(str::to_string),
        actor_url: format!("https://{origin}/accounts/{name}"),
        actor_refreshed_at: Utc::now() - chrono::Duration::days(refreshed_days_ago),
        created_at: created,
        updated_at: created,
    }
}

struct VideoFixture {
    id: DbId,
    account_id: DbId,
    name: &'static str,
    privacy: Privacy,
    tags: &'static [&'static str],
    nsfw: bool,
    category: Option<i32>,
    is_local: bool,
}

fn video(fixture: VideoFixture) -> Video {
    let at = Utc::now() - chrono::Duration::hours(fixture.id);
    Video {
        id: fixture.id,
        uuid: Uuid::from_u128(fixture.id as u128),
        channel_id: fixture.account_id * 10,
        account_id: fixture.account_id,
        name: fixture.name.to_string(),
        category: fixture.category,
        licence: None,
        language: None,
        nsfw: fixture.nsfw,
        privacy: fixture.privacy.as_str().to_string(),
        is_local: fixture.is_local,
        duration: 60,
        views: fixture.id,
        likes: 0,
        dislikes: 0,
        tags: fixture.tags.iter().map(|t| t.to_string()).collect(),
        published_at: at,
        created_at: at,
    }
}

fn playlist(
    id: DbId,
    uuid: Uuid,
    account_id: DbId,
    name: &str,
    privacy: &str,
    playlist_type: &str,
) -> Playlist {
    let at = Utc::now() - chrono::Duration::hours(id);
    Playlist {
        id,
        uuid,
        account_id,
        channel_id: None,
        display_name: name.to_string(),
        description: None,
        privacy: privacy.to_string(),
        playlist_type: playlist_type.to_string(),
        videos_length: 0,
        created_at: at,
        updated_at: at,
    }
}

impl MemoryStore {
    /// - alice: local, four videos (two public, one unlisted, one private),
    ///   four playlists, two ratings.
    /// - bob: remote on `remote.example`, last refreshed 3 days ago, one
    ///   remote public video.
    /// - carol: remote on `fresh.example`, refreshed just now.
    pub fn standard() -> Self {
        let accounts = vec![
            account(ALICE, "alice", None, 0),
            account(BOB, "bob", Some("remote.example"), 3),
            account(CAROL, "carol", Some("fresh.example"), 0),
        ];

        let channels = vec![
            Channel {
                id: 10,
                account_id: ALICE,
                name: "alice_channel".to_string(),
                display_name: "Alice's channel".to_string(),
                description: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            Channel {
                id: 11,
                account_id: ALICE,
                name: "alice_music".to_string(),
                display_name: "Alice makes music".to_string(),
                description: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        ];

        let videos = vec![
            video(VideoFixture {
                id: 100,
                account_id: ALICE,
                name: "Alpha",
                privacy: Privacy::Public,
                tags: &["cats", "dogs"],
                nsfw: false,
                category: Some(2),
                is_local: true,
            }),
            video(VideoFixture {
                id: 101,
                account_id: ALICE,
                name: "Bravo",
                privacy: Privacy::Unlisted,
                tags: &["dogs"],
                nsfw: false,
                category: None,
                is_local: true,
            }),
            video(VideoFixture {
                id: 102,
                account_id: ALICE,
                name: "Charlie",
                privacy: Privacy::Private,
                tags: &[],
                nsfw: false,
                category: None,
                is_local: true,
            }),
            video(VideoFixture {
                id: 103,
                account_id: ALICE,
                name: "Delta",
                privacy: Privacy::Public,
                tags: &["Cats"],
                nsfw: true,
                category: Some(1),
                is_local: true,
            }),
            video(VideoFixture {
                id: 200,
                account_id: BOB,
                name: "Remote",
                privacy: Privacy::Public,
                tags: &[],
                nsfw: false,
                category: None,
                is_local: false,
            }),
        ];

        let playlists = vec![
            playlist(1000, Uuid::from_u128(0x2000), ALICE, "Favourites", "public", "regular"),
            playlist(1001, UNLISTED_PLAYLIST, ALICE, "Shared", "unlisted", "regular"),
            playlist(1002, PRIVATE_PLAYLIST, ALICE, "Secret", "private", "regular"),
            playlist(1003, Uuid::from_u128(0x2003), ALICE, "Watch later", "private", "watch_later"),
        ];

        let ratings = [(100, "Alpha", "like"), (103, "Delta", "dislike")]
            .into_iter()
            .enumerate()
            .map(|(i, (video_id, video_name, rating))| {
                (
                    ALICE,
                    Rating {
                        id: i as DbId + 1,
                        video_id,
                        video_uuid: Uuid::from_u128(video_id as u128),
                        video_name: video_name.to_string(),
                        rating: rating.to_string(),
                        created_at: Utc::now() - chrono::Duration::minutes(i as i64),
                    },
                )
            })
            .collect();

        Self {
            accounts,
            channels,
            videos,
            playlists,
            ratings,
            ..Default::default()
        }
    }

    fn check_available(&self) -> Result<(), CoreError> {
        if self.unavailable {
            Err(CoreError::StoreUnavailable("connection refused".into()))
        } else {
            Ok(())
        }
    }

    fn host_of(&self, account_id: DbId) -> Option<&str> {
        self.accounts
            .iter()
            .find(|a| a.id == account_id)
            .and_then(|a| a.host.as_deref())
    }
}

/// Sort, then slice `[start, start + count)`. `total` is taken before slicing.
fn paginate<T>(
    mut items: Vec<T>,
    query: &ListQuery,
    compare: impl Fn(&T, &T) -> Ordering,
    id: impl Fn(&T) -> DbId,
) -> ResultPage<T> {
    items.sort_by(|a, b| {
        let ord = compare(a, b);
        let ord = if query.sort.descending { ord.reverse() } else { ord };
        ord.then_with(|| id(a).cmp(&id(b)))
    });

    let total = items.len() as i64;
    let items = items
        .into_iter()
        .skip(query.start as usize)
        .take(query.count as usize)
        .collect();

    ResultPage::new(items, total)
}

/// Field-level match mirroring the `videos` WHERE clause: OR within a
/// list, AND across fields, tags compared case-insensitively.
fn video_matches(filter: &VideoFilter, video: &Video) -> bool {
    let in_list = |allowed: &[i32], value: Option<i32>| {
        allowed.is_empty() || value.is_some_and(|v| allowed.contains(&v))
    };
    let has_tag = |wanted: &String| video.tags.iter().any(|t| t.eq_ignore_ascii_case(wanted));

    in_list(&filter.category_one_of, video.category)
        && in_list(&filter.licence_one_of, video.licence)
        && (filter.language_one_of.is_empty()
            || video
                .language
                .as_ref()
                .is_some_and(|l| filter.language_one_of.contains(l)))
        && (filter.tags_one_of.is_empty() || filter.tags_one_of.iter().any(has_tag))
        && filter.tags_all_of.iter().all(has_tag)
        && filter.nsfw.admits(video.nsfw)
        && (!filter.local_only || video.is_local)
}

fn privacy_of(raw: &str) -> Privacy {
    raw.parse().unwrap()
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn is_healthy(&self) -> bool {
        !self.unavailable
    }
}

#[async_trait]
impl AccountSource for MemoryStore {
    async fn find_account_by_handle(
        &self,
        handle: &AccountHandle,
    ) -> Result<Option<Account>, CoreError> {
        self.check_available()?;
        Ok(self
            .accounts
            .iter()
            .find(|a| a.name == handle.name && a.host == handle.host)
            .cloned())
    }

    async fn nsfw_policy_for(&self, account_id: DbId) -> Result<Option<NsfwPolicy>, CoreError> {
        self.check_available()?;
        Ok(self.nsfw_policies.get(&account_id).copied())
    }
}

#[async_trait]
impl PlaylistSource for MemoryStore {
    async fn find_playlist_by_uuid(&self, uuid: Uuid) -> Result<Option<Playlist>, CoreError> {
        self.check_available()?;
        Ok(self.playlists.iter().find(|p| p.uuid == uuid).cloned())
    }
}

#[async_trait]
impl ListExecutor<Accounts> for MemoryStore {
    type Item = Account;

    async fn execute_list(
        &self,
        _scope_id: Option<DbId>,
        query: &ListQuery,
        _filter: &FilterDescriptor,
    ) -> Result<ResultPage<Account>, CoreError> {
        self.check_available()?;
        let field = query.sort.field;
        Ok(paginate(
            self.accounts.clone(),
            query,
            |a, b| match field {
                "name" => a.name.cmp(&b.name),
                "createdAt" => a.created_at.cmp(&b.created_at),
                _ => a.id.cmp(&b.id),
            },
            |a| a.id,
        ))
    }
}

#[async_trait]
impl ListExecutor<Videos> for MemoryStore {
    type Item = Video;

    async fn execute_list(
        &self,
        scope_id: Option<DbId>,
        query: &ListQuery,
        filter: &FilterDescriptor,
    ) -> Result<ResultPage<Video>, CoreError> {
        self.check_available()?;
        let ResourceFilter::Videos(video_filter) = filter.filter() else {
            panic!("expected a video filter, got {}", filter.kind());
        };
        let visibility = filter.visibility();

        let matching: Vec<Video> = self
            .videos
            .iter()
            .filter(|v| Some(v.account_id) == scope_id)
            .filter(|v| visibility.includes(privacy_of(&v.privacy)))
            .filter(|v| video_matches(video_filter, v))
            .filter(|v| {
                !video_filter.follower_scope.is_restricted()
                    || v.is_local
                    || self
                        .host_of(v.account_id)
                        .is_some_and(|h| self.followed_hosts.iter().any(|f| f == h))
            })
            .cloned()
            .collect();

        let field = query.sort.field;
        Ok(paginate(
            matching,
            query,
            |a, b| match field {
                "name" => a.name.cmp(&b.name),
                "duration" => a.duration.cmp(&b.duration),
                "createdAt" => a.created_at.cmp(&b.created_at),
                "views" => a.views.cmp(&b.views),
                "likes" => a.likes.cmp(&b.likes),
                _ => a.published_at.cmp(&b.published_at),
            },
            |v| v.id,
        ))
    }
}

#[async_trait]
impl ListExecutor<Channels> for MemoryStore {
    type Item = Channel;

    async fn execute_list(
        &self,
        scope_id: Option<DbId>,
        query: &ListQuery,
        filter: &FilterDescriptor,
    ) -> Result<ResultPage<Channel>, CoreError> {
        self.check_available()?;
        let ResourceFilter::Channels(channel_filter) = filter.filter() else {
            panic!("expected a channel filter, got {}", filter.kind());
        };
        let search = channel_filter.search.as_deref().map(str::to_lowercase);

        let matching: Vec<Channel> = self
            .channels
            .iter()
            .filter(|c| Some(c.account_id) == scope_id)
            .filter(|c| {
                search.as_deref().map_or(true, |s| {
                    c.name.to_lowercase().contains(s) || c.display_name.to_lowercase().contains(s)
                })
            })
            .cloned()
            .collect();

        let field = query.sort.field;
        Ok(paginate(
            matching,
            query,
            |a, b| match field {
                "name" => a.name.cmp(&b.name),
                "updatedAt" => a.updated_at.cmp(&b.updated_at),
                "createdAt" => a.created_at.cmp(&b.created_at),
                _ => a.id.cmp(&b.id),
            },
            |c| c.id,
        ))
    }
}

#[async_trait]
impl ListExecutor<Playlists> for MemoryStore {
    type Item = Playlist;

    async fn execute_list(
        &self,
        scope_id: Option<DbId>,
        query: &ListQuery,
        filter: &FilterDescriptor,
    ) -> Result<ResultPage<Playlist>, CoreError> {
        self.check_available()?;
        let ResourceFilter::Playlists(playlist_filter) = filter.filter() else {
            panic!("expected a playlist filter, got {}", filter.kind());
        };
        let visibility = filter.visibility();
        let search = playlist_filter.search.as_deref().map(str::to_lowercase);

        let matching: Vec<Playlist> = self
            .playlists
            .iter()
            .filter(|p| Some(p.account_id) == scope_id)
            .filter(|p| visibility.includes(privacy_of(&p.privacy)))
            .filter(|p| {
                playlist_filter
                    .playlist_type
                    .map_or(true, |t| p.playlist_type == t.as_str())
            })
            .filter(|p| {
                search
                    .as_deref()
                    .map_or(true, |s| p.display_name.to_lowercase().contains(s))
            })
            .cloned()
            .collect();

        let field = query.sort.field;
        Ok(paginate(
            matching,
            query,
            |a, b| match field {
                "displayName" => a.display_name.cmp(&b.display_name),
                "updatedAt" => a.updated_at.cmp(&b.updated_at),
                "createdAt" => a.created_at.cmp(&b.created_at),
                _ => a.id.cmp(&b.id),
            },
            |p| p.id,
        ))
    }
}

#[async_trait]
impl ListExecutor<Ratings> for MemoryStore {
    type Item = Rating;

    async fn execute_list(
        &self,
        scope_id: Option<DbId>,
        query: &ListQuery,
        filter: &FilterDescriptor,
    ) -> Result<ResultPage<Rating>, CoreError> {
        self.check_available()?;
        let ResourceFilter::Ratings(rating_filter) = filter.filter() else {
            panic!("expected a rating filter, got {}", filter.kind());
        };

        let matching: Vec<Rating> = self
            .ratings
            .iter()
            .filter(|(rater, _)| Some(*rater) == scope_id)
            .map(|(_, rating)| rating)
            .filter(|r| rating_filter.rating.map_or(true, |t| r.rating == t.as_str()))
            .cloned()
            .collect();

        Ok(paginate(
            matching,
            query,
            |a, b| a.created_at.cmp(&b.created_at),
            |r| r.id,
        ))
    }
}
