//! Filter composition for account listings.
//!
//! [`compose`] validates the per-resource request filters against the
//! caller's capabilities and the resolved [`VisibilityScope`], and produces
//! an opaque [`FilterDescriptor`] for the store. Nothing here runs a query.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::resources::ResourceKind;
use crate::roles::Identity;
use crate::visibility::VisibilityScope;

// ---------------------------------------------------------------------------
// NSFW
// ---------------------------------------------------------------------------

/// A user's (or the instance's) NSFW display preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NsfwPolicy {
    Display,
    Blur,
    DoNotList,
}

impl FromStr for NsfwPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "display" => Ok(Self::Display),
            "blur" => Ok(Self::Blur),
            "do_not_list" => Ok(Self::DoNotList),
            other => Err(CoreError::Validation(format!(
                "Unknown NSFW policy '{other}'"
            ))),
        }
    }
}

/// The NSFW constraint applied to a video listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NsfwFilter {
    /// Only non-NSFW videos.
    Exclude,
    /// Only NSFW videos.
    Only,
    Both,
}

impl NsfwFilter {
    pub fn admits(&self, nsfw: bool) -> bool {
        match self {
            Self::Exclude => !nsfw,
            Self::Only => nsfw,
            Self::Both => true,
        }
    }
}

/// Resolve the NSFW filter: an explicit `nsfw` parameter wins, otherwise the
/// caller's default policy decides.
pub fn resolve_nsfw(explicit: Option<&str>, default: NsfwPolicy) -> Result<NsfwFilter, CoreError> {
    match explicit {
        Some("true") => Ok(NsfwFilter::Only),
        Some("false") => Ok(NsfwFilter::Exclude),
        Some("both") => Ok(NsfwFilter::Both),
        Some(other) => Err(CoreError::Validation(format!(
            "nsfw must be one of true, false, both; got '{other}'"
        ))),
        None => Ok(match default {
            NsfwPolicy::DoNotList => NsfwFilter::Exclude,
            NsfwPolicy::Blur | NsfwPolicy::Display => NsfwFilter::Both,
        }),
    }
}

// ---------------------------------------------------------------------------
// Follower restriction
// ---------------------------------------------------------------------------

/// Whether a listing is limited to content reachable through this
/// instance's follow graph.
///
/// `Unspecified` behaves exactly like `Restricted`; only an explicit
/// `Unrestricted` lifts the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowerScope {
    Unrestricted,
    Restricted,
    #[default]
    Unspecified,
}

impl FollowerScope {
    pub fn is_restricted(&self) -> bool {
        !matches!(self, Self::Unrestricted)
    }
}

// ---------------------------------------------------------------------------
// Caller capabilities
// ---------------------------------------------------------------------------

/// Instance settings for searching remote URIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteUriSearchPolicy {
    pub users: bool,
    pub anonymous: bool,
}

impl RemoteUriSearchPolicy {
    pub fn allows(&self, identity: Option<&Identity>) -> bool {
        match identity {
            Some(_) => self.users,
            None => self.anonymous,
        }
    }
}

/// What the caller is allowed to widen in a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerCapabilities {
    pub can_search_remote_uri: bool,
    pub can_see_all_videos: bool,
    /// NSFW policy used when the request has no explicit `nsfw` value.
    pub nsfw_default: NsfwPolicy,
}

impl CallerCapabilities {
    /// Derive capabilities from the caller identity and instance settings.
    /// An anonymous caller, or an unproven capability, gets the restrictive
    /// branch.
    pub fn resolve(
        identity: Option<&Identity>,
        remote_uri: RemoteUriSearchPolicy,
        nsfw_preference: Option<NsfwPolicy>,
        instance_nsfw: NsfwPolicy,
    ) -> Self {
        Self {
            can_search_remote_uri: remote_uri.allows(identity),
            can_see_all_videos: identity.is_some_and(|id| id.role.can_see_all_videos()),
            nsfw_default: nsfw_preference.unwrap_or(instance_nsfw),
        }
    }

    /// The least privileged capability set.
    pub fn anonymous(instance_nsfw: NsfwPolicy) -> Self {
        Self {
            can_search_remote_uri: false,
            can_see_all_videos: false,
            nsfw_default: instance_nsfw,
        }
    }
}

// ---------------------------------------------------------------------------
// Raw request filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct VideoFilterParams {
    pub category_one_of: Vec<i32>,
    pub licence_one_of: Vec<i32>,
    pub language_one_of: Vec<String>,
    pub tags_one_of: Vec<String>,
    pub tags_all_of: Vec<String>,
    pub nsfw: Option<String>,
    /// `local`, `all-local` or `all`.
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ChannelFilterParams {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PlaylistFilterParams {
    pub playlist_type: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RatingFilterParams {
    pub rating: Option<String>,
}

/// Untrusted filters of one list request, tagged by resource type.
#[derive(Debug, Clone)]
pub enum RawFilters {
    Accounts,
    Videos(VideoFilterParams),
    Channels(ChannelFilterParams),
    Playlists(PlaylistFilterParams),
    Ratings(RatingFilterParams),
}

// ---------------------------------------------------------------------------
// Validated filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistType {
    Regular,
    WatchLater,
}

impl PlaylistType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::WatchLater => "watch_later",
        }
    }
}

impl FromStr for PlaylistType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Self::Regular),
            "watch_later" => Ok(Self::WatchLater),
            other => Err(CoreError::Validation(format!(
                "playlistType must be regular or watch_later; got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingType {
    Like,
    Dislike,
}

impl RatingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl FromStr for RatingType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            other => Err(CoreError::Validation(format!(
                "rating must be like or dislike; got '{other}'"
            ))),
        }
    }
}

/// Validated video constraints. Empty lists mean "no constraint"; values OR
/// within a field and AND across fields. Tags compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFilter {
    pub category_one_of: Vec<i32>,
    pub licence_one_of: Vec<i32>,
    pub language_one_of: Vec<String>,
    /// Lower-cased, deduplicated; a video matches if it has any of them.
    pub tags_one_of: Vec<String>,
    /// Lower-cased, deduplicated; a video matches if it has all of them.
    pub tags_all_of: Vec<String>,
    pub nsfw: NsfwFilter,
    pub local_only: bool,
    pub follower_scope: FollowerScope,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelFilter {
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaylistFilter {
    pub playlist_type: Option<PlaylistType>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RatingFilter {
    pub rating: Option<RatingType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceFilter {
    Accounts,
    Videos(VideoFilter),
    Channels(ChannelFilter),
    Playlists(PlaylistFilter),
    Ratings(RatingFilter),
}

impl ResourceFilter {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Accounts => ResourceKind::Accounts,
            Self::Videos(_) => ResourceKind::Videos,
            Self::Channels(_) => ResourceKind::Channels,
            Self::Playlists(_) => ResourceKind::Playlists,
            Self::Ratings(_) => ResourceKind::Ratings,
        }
    }
}

/// Validated constraints of one list request. Only [`compose`] builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDescriptor {
    visibility: VisibilityScope,
    filter: ResourceFilter,
}

impl FilterDescriptor {
    pub fn kind(&self) -> ResourceKind {
        self.filter.kind()
    }

    pub fn visibility(&self) -> VisibilityScope {
        self.visibility
    }

    pub fn filter(&self) -> &ResourceFilter {
        &self.filter
    }
}

// ---------------------------------------------------------------------------
// compose
// ---------------------------------------------------------------------------

/// Validate `raw` for the caller and build the store-facing descriptor.
pub fn compose(
    raw: RawFilters,
    scope: VisibilityScope,
    caller: &CallerCapabilities,
) -> Result<FilterDescriptor, CoreError> {
    let (visibility, filter) = match raw {
        RawFilters::Accounts => (scope, ResourceFilter::Accounts),
        RawFilters::Videos(params) => {
            let (visibility, filter) = compose_videos(params, scope, caller)?;
            (visibility, ResourceFilter::Videos(filter))
        }
        RawFilters::Channels(params) => (
            scope,
            ResourceFilter::Channels(ChannelFilter {
                search: normalize_search(params.search),
            }),
        ),
        RawFilters::Playlists(params) => (
            scope,
            ResourceFilter::Playlists(PlaylistFilter {
                playlist_type: params
                    .playlist_type
                    .as_deref()
                    .map(str::parse::<PlaylistType>)
                    .transpose()?,
                search: normalize_search(params.search),
            }),
        ),
        RawFilters::Ratings(params) => (
            scope,
            ResourceFilter::Ratings(RatingFilter {
                rating: params
                    .rating
                    .as_deref()
                    .map(str::parse::<RatingType>)
                    .transpose()?,
            }),
        ),
    };

    Ok(FilterDescriptor { visibility, filter })
}

fn compose_videos(
    params: VideoFilterParams,
    scope: VisibilityScope,
    caller: &CallerCapabilities,
) -> Result<(VisibilityScope, VideoFilter), CoreError> {
    // `all-local` and `all` lift privacy filtering; staff only.
    let (local_only, visibility) = match params.filter.as_deref() {
        None => (false, scope),
        Some("local") => (true, scope),
        Some(mode @ ("all-local" | "all")) => {
            if !caller.can_see_all_videos {
                return Err(CoreError::Forbidden(format!(
                    "filter={mode} requires the right to see all videos"
                )));
            }
            (mode == "all-local", VisibilityScope::All)
        }
        Some(other) => {
            return Err(CoreError::Validation(format!(
                "filter must be one of local, all-local, all; got '{other}'"
            )))
        }
    };

    let follower_scope = if caller.can_search_remote_uri {
        FollowerScope::Unrestricted
    } else {
        FollowerScope::Restricted
    };

    let filter = VideoFilter {
        category_one_of: params.category_one_of,
        licence_one_of: params.licence_one_of,
        language_one_of: params.language_one_of,
        tags_one_of: normalize_tags(params.tags_one_of),
        tags_all_of: normalize_tags(params.tags_all_of),
        nsfw: resolve_nsfw(params.nsfw.as_deref(), caller.nsfw_default)?,
        local_only,
        follower_scope,
    };

    Ok((visibility, filter))
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let set: BTreeSet<String> = tags
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    set.into_iter().collect()
}

fn normalize_search(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
