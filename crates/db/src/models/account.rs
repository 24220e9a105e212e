//! Account entity with its cached federated actor metadata.

use fedtube_core::account::FederatedActor;
use fedtube_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A local or remote account. `host` is `None` for local accounts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: DbId,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub host: Option<String>,
    #[serde(rename = "url")]
    pub actor_url: String,
    #[serde(skip)]
    pub actor_refreshed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl FederatedActor for Account {
    fn actor_url(&self) -> &str {
        &self.actor_url
    }

    fn is_local(&self) -> bool {
        self.host.is_none()
    }

    fn last_refreshed_at(&self) -> Timestamp {
        self.actor_refreshed_at
    }
}
