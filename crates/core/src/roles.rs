//! Well-known role names and the rights derived from them.
//!
//! These must match the seed data in `20261001000001_create_accounts.sql`.

use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_USER: &str = "user";

/// A user role, parsed from the `role` claim of an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Moderator,
    User,
}

impl Role {
    /// Parse a role name. Unknown names map to `None` so callers can treat
    /// them as the least privileged role.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            ROLE_ADMIN => Some(Self::Admin),
            ROLE_MODERATOR => Some(Self::Moderator),
            ROLE_USER => Some(Self::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Moderator => ROLE_MODERATOR,
            Self::User => ROLE_USER,
        }
    }

    /// Whether this role may list videos regardless of their privacy
    /// (`filter=all-local` / `filter=all`).
    pub fn can_see_all_videos(&self) -> bool {
        matches!(self, Self::Admin | Self::Moderator)
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The caller's own account id.
    pub account_id: DbId,
    pub role: Role,
}

impl Identity {
    pub fn new(account_id: DbId, role: Role) -> Self {
        Self { account_id, role }
    }
}
