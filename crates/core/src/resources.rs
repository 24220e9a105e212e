//! Listable resource types and their per-type configuration.

use crate::pagination::SortSpec;

/// The resource types exposed through account listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Accounts,
    Videos,
    Channels,
    Playlists,
    Ratings,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accounts => "accounts",
            Self::Videos => "videos",
            Self::Channels => "video-channels",
            Self::Playlists => "video-playlists",
            Self::Ratings => "ratings",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability set of a resource that can be listed through
/// [`ListService`](crate::listing::ListService).
pub trait Listable: Send + Sync + 'static {
    const KIND: ResourceKind;
    const SORT: SortSpec;
}

pub struct Accounts;
pub struct Videos;
pub struct Channels;
pub struct Playlists;
pub struct Ratings;

impl Listable for Accounts {
    const KIND: ResourceKind = ResourceKind::Accounts;
    const SORT: SortSpec = SortSpec {
        whitelist: &["id", "name", "createdAt"],
        default: "-createdAt",
    };
}

impl Listable for Videos {
    const KIND: ResourceKind = ResourceKind::Videos;
    const SORT: SortSpec = SortSpec {
        whitelist: &[
            "name",
            "duration",
            "createdAt",
            "publishedAt",
            "views",
            "likes",
        ],
        default: "-publishedAt",
    };
}

impl Listable for Channels {
    const KIND: ResourceKind = ResourceKind::Channels;
    const SORT: SortSpec = SortSpec {
        whitelist: &["id", "name", "updatedAt", "createdAt"],
        default: "-createdAt",
    };
}

impl Listable for Playlists {
    const KIND: ResourceKind = ResourceKind::Playlists;
    const SORT: SortSpec = SortSpec {
        whitelist: &["id", "displayName", "createdAt", "updatedAt"],
        default: "-createdAt",
    };
}

impl Listable for Ratings {
    const KIND: ResourceKind = ResourceKind::Ratings;
    const SORT: SortSpec = SortSpec {
        whitelist: &["createdAt"],
        default: "-createdAt",
    };
}
