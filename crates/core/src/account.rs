//! Account handles and federated actor freshness.

use std::time::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Default refresh interval for remote actor metadata (two days).
pub const ACTOR_REFRESH_INTERVAL: Duration = Duration::from_secs(2 * 24 * 3600);

// ---------------------------------------------------------------------------
// Freshness
// ---------------------------------------------------------------------------

/// Read access to the federation metadata backing an account.
pub trait FederatedActor {
    /// Canonical actor URL.
    fn actor_url(&self) -> &str;

    /// `true` for accounts hosted on this instance; their metadata is
    /// authoritative and never goes stale.
    fn is_local(&self) -> bool;

    /// When the cached actor metadata was last fetched.
    fn last_refreshed_at(&self) -> Timestamp;

    /// Whether the cached metadata is older than `threshold` at `now`.
    fn is_outdated(&self, now: Timestamp, threshold: Duration) -> bool {
        is_actor_outdated(self.is_local(), self.last_refreshed_at(), now, threshold)
    }
}

/// Staleness rule shared by every [`FederatedActor`].
pub fn is_actor_outdated(
    is_local: bool,
    last_refreshed_at: Timestamp,
    now: Timestamp,
    threshold: Duration,
) -> bool {
    if is_local {
        return false;
    }
    match chrono::Duration::from_std(threshold) {
        Ok(threshold) => now - last_refreshed_at > threshold,
        // A threshold beyond chrono's range never expires.
        Err(_) => false,
    }
}

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// An account reference as it appears in URLs: `name` for local accounts,
/// `name@host` for remote ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountHandle {
    pub name: String,
    pub host: Option<String>,
}

impl AccountHandle {
    /// Parse a handle. A host equal to `local_host` is folded into a local
    /// handle so `alice@this.instance` and `alice` resolve identically.
    pub fn parse(raw: &str, local_host: &str) -> Result<Self, CoreError> {
        let raw = raw.trim().trim_start_matches('@');
        let (name, host) = match raw.split_once('@') {
            Some((name, host)) => (name, Some(host)),
            None => (raw, None),
        };

        if name.is_empty() || !name.chars().all(is_handle_char) {
            return Err(CoreError::Validation(format!(
                "Invalid account handle '{raw}'"
            )));
        }

        let host = match host {
            Some(h) if h.is_empty() || !h.chars().all(is_host_char) => {
                return Err(CoreError::Validation(format!(
                    "Invalid account handle '{raw}'"
                )))
            }
            Some(h) if h.eq_ignore_ascii_case(local_host) => None,
            Some(h) => Some(h.to_lowercase()),
            None => None,
        };

        Ok(Self {
            name: name.to_string(),
            host,
        })
    }
}

impl std::fmt::Display for AccountHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.host {
            Some(host) => write!(f, "{}@{}", self.name, host),
            None => f.write_str(&self.name),
        }
    }
}

fn is_handle_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

fn is_host_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
