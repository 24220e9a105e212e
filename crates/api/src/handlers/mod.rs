pub mod accounts;
pub mod playlists;

use fedtube_core::filters::CallerCapabilities;
use fedtube_core::roles::Identity;

use crate::error::AppResult;
use crate::state::AppState;

/// Resolve what the caller may widen: remote-URI search, the
/// see-all-videos right, and their NSFW default.
pub(crate) async fn caller_capabilities(
    state: &AppState,
    requester: Option<&Identity>,
) -> AppResult<CallerCapabilities> {
    let listing = &state.config.listing;

    let nsfw_preference = match requester {
        Some(identity) => state.store.nsfw_policy_for(identity.account_id).await?,
        None => None,
    };

    Ok(CallerCapabilities::resolve(
        requester,
        listing.remote_uri_search,
        nsfw_preference,
        listing.instance_nsfw,
    ))
}
