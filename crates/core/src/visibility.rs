//! Visibility policy: which privacy classes a requester may see for a
//! given account.
//!
//! Resolution is a pure function of the target account and the requester,
//! recomputed on every request. Ambiguity resolves to the most restrictive
//! scope.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Identity;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Privacy
// ---------------------------------------------------------------------------

/// Privacy class of a video or playlist, as stored in the `privacy` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privacy {
    Public,
    Unlisted,
    Private,
    /// Visible to logged-in users of this instance only. Never part of an
    /// anonymous or cross-account listing.
    Internal,
}

impl Privacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Unlisted => "unlisted",
            Self::Private => "private",
            Self::Internal => "internal",
        }
    }
}

impl FromStr for Privacy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "unlisted" => Ok(Self::Unlisted),
            "private" => Ok(Self::Private),
            "internal" => Ok(Self::Internal),
            other => Err(CoreError::Validation(format!(
                "Unknown privacy '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// VisibilityScope
// ---------------------------------------------------------------------------

/// The set of privacy classes a requester may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityScope {
    PublicOnly,
    PublicAndUnlisted,
    All,
}

impl VisibilityScope {
    /// Whether a resource with the given privacy is inside this scope.
    pub fn includes(&self, privacy: Privacy) -> bool {
        match self {
            Self::PublicOnly => privacy == Privacy::Public,
            Self::PublicAndUnlisted => matches!(privacy, Privacy::Public | Privacy::Unlisted),
            Self::All => true,
        }
    }

    /// Privacy values allowed by this scope, or `None` when unrestricted.
    pub fn allowed_privacies(&self) -> Option<&'static [Privacy]> {
        match self {
            Self::PublicOnly => Some(&[Privacy::Public]),
            Self::PublicAndUnlisted => Some(&[Privacy::Public, Privacy::Unlisted]),
            Self::All => None,
        }
    }

    /// Private and unlisted playlists are included only for the owner.
    pub fn includes_private_and_unlisted(&self) -> bool {
        matches!(self, Self::All)
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// How the resource is being reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityPolicy {
    /// Enumerating an account's resources.
    Listing,
    /// Fetching one resource by its identifier; unlisted resources are
    /// reachable by anyone holding the link.
    DirectLink,
}

/// Compute the visibility scope of `requester` over `target_account_id`.
pub fn resolve_visibility(
    target_account_id: DbId,
    requester: Option<&Identity>,
    policy: VisibilityPolicy,
) -> VisibilityScope {
    match requester {
        Some(identity) if identity.account_id == target_account_id => VisibilityScope::All,
        _ => match policy {
            VisibilityPolicy::Listing => VisibilityScope::PublicOnly,
            VisibilityPolicy::DirectLink => VisibilityScope::PublicAndUnlisted,
        },
    }
}

/// Ownership check for owner-only resources.
///
/// Anonymous callers get `Unauthorized`, other accounts get `Forbidden`.
pub fn require_owner(
    target_account_id: DbId,
    requester: Option<&Identity>,
) -> Result<&Identity, CoreError> {
    let identity = requester.ok_or_else(|| {
        CoreError::Unauthorized("Authentication required to access this resource".into())
    })?;

    if identity.account_id != target_account_id {
        return Err(CoreError::Forbidden(
            "Cannot access resources of another account".into(),
        ));
    }

    Ok(identity)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
