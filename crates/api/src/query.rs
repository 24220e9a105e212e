//! Query parameter types for the listing endpoints.
//!
//! Every list endpoint takes `start`, `count` and `sort`; resource-specific
//! filters follow. Multi-valued filters (`categoryOneOf=1,2`) are
//! comma-separated.
//!
//! `start` and `count` are read as text and parsed here, so a value too
//! large for `i64` saturates (and `count` is then clamped) instead of
//! failing deserialization.

use std::num::IntErrorKind;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use fedtube_core::filters::{
    ChannelFilterParams, PlaylistFilterParams, RatingFilterParams, VideoFilterParams,
};
use fedtube_core::pagination::{normalize, ListQuery, PageDefaults};
use fedtube_core::resources::Listable;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Query string extractor for list endpoints.
///
/// Same as [`Query`], but a malformed query string is rejected with the JSON
/// `BAD_REQUEST` envelope instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListParams<T>(pub T);

impl<T, S> FromRequestParts<S> for ListParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(params))
    }
}

/// `?start=&count=&sort=` shared by all list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub start: Option<String>,
    pub count: Option<String>,
    pub sort: Option<String>,
}

impl PageParams {
    /// Normalize against `R`'s sort whitelist.
    pub fn to_query<R: Listable>(&self, defaults: PageDefaults) -> AppResult<ListQuery> {
        let start = parse_page_number("start", self.start.as_deref())?;
        let count = parse_page_number("count", self.count.as_deref())?;

        Ok(normalize(
            start,
            count,
            self.sort.as_deref(),
            &R::SORT,
            defaults,
        )?)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListParams {
    pub start: Option<String>,
    pub count: Option<String>,
    pub sort: Option<String>,
    pub category_one_of: Option<String>,
    pub licence_one_of: Option<String>,
    pub language_one_of: Option<String>,
    pub tags_one_of: Option<String>,
    pub tags_all_of: Option<String>,
    pub nsfw: Option<String>,
    pub filter: Option<String>,
}

impl VideoListParams {
    pub fn page(&self) -> PageParams {
        PageParams {
            start: self.start.clone(),
            count: self.count.clone(),
            sort: self.sort.clone(),
        }
    }

    pub fn into_filters(self) -> AppResult<VideoFilterParams> {
        Ok(VideoFilterParams {
            category_one_of: parse_ints("categoryOneOf", self.category_one_of.as_deref())?,
            licence_one_of: parse_ints("licenceOneOf", self.licence_one_of.as_deref())?,
            language_one_of: split_csv(self.language_one_of.as_deref()),
            tags_one_of: split_csv(self.tags_one_of.as_deref()),
            tags_all_of: split_csv(self.tags_all_of.as_deref()),
            nsfw: self.nsfw,
            filter: self.filter,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChannelListParams {
    pub start: Option<String>,
    pub count: Option<String>,
    pub sort: Option<String>,
    pub search: Option<String>,
}

impl ChannelListParams {
    pub fn page(&self) -> PageParams {
        PageParams {
            start: self.start.clone(),
            count: self.count.clone(),
            sort: self.sort.clone(),
        }
    }

    pub fn into_filters(self) -> ChannelFilterParams {
        ChannelFilterParams {
            search: self.search,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistListParams {
    pub start: Option<String>,
    pub count: Option<String>,
    pub sort: Option<String>,
    pub playlist_type: Option<String>,
    pub search: Option<String>,
}

impl PlaylistListParams {
    pub fn page(&self) -> PageParams {
        PageParams {
            start: self.start.clone(),
            count: self.count.clone(),
            sort: self.sort.clone(),
        }
    }

    pub fn into_filters(self) -> PlaylistFilterParams {
        PlaylistFilterParams {
            playlist_type: self.playlist_type,
            search: self.search,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RatingListParams {
    pub start: Option<String>,
    pub count: Option<String>,
    pub sort: Option<String>,
    pub rating: Option<String>,
}

impl RatingListParams {
    pub fn page(&self) -> PageParams {
        PageParams {
            start: self.start.clone(),
            count: self.count.clone(),
            sort: self.sort.clone(),
        }
    }

    pub fn into_filters(self) -> RatingFilterParams {
        RatingFilterParams {
            rating: self.rating,
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse `start` / `count`. Blank means absent; out-of-range integers
/// saturate to `i64::MIN` / `i64::MAX` and are judged by [`normalize`].
fn parse_page_number(name: &str, raw: Option<&str>) -> AppResult<Option<i64>> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<i64>() {
        Ok(value) => Ok(Some(value)),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(Some(i64::MAX)),
            IntErrorKind::NegOverflow => Ok(Some(i64::MIN)),
            _ => Err(AppError::BadRequest(format!(
                "{name} must be an integer, got '{raw}'"
            ))),
        },
    }
}

fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_ints(name: &str, raw: Option<&str>) -> AppResult<Vec<i32>> {
    split_csv(raw)
        .iter()
        .map(|v| {
            v.parse::<i32>()
                .map_err(|_| AppError::BadRequest(format!("{name} must be a list of integers, got '{v}'")))
        })
        .collect()
}
