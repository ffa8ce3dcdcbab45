//! Credential store: persistence for user records.

mod postgres;
#[cfg(test)]
pub(crate) mod memory;

pub use postgres::PgUserStore;

use async_trait::async_trait;
use uuid::Uuid;

use pwa_shared::errors::AppResult;

use crate::models::{User, UserDraft};

/// Persistence port for users.
///
/// Implementations hash the draft's plaintext password on `create`, reject
/// duplicate emails with `ErrorCode::EmailAlreadyExists`, and write the push
/// subscription as a single-field update (last write wins).
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Lookup by email. Callers pass the normalized (trimmed, lower-cased) address.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn list(&self) -> AppResult<Vec<User>>;

    async fn create(&self, draft: UserDraft) -> AppResult<User>;

    /// Overwrite (or clear, with `None`) the user's push subscription.
    /// Returns `false` when no user has this id.
    async fn set_push_subscription(
        &self,
        id: Uuid,
        subscription: Option<serde_json::Value>,
    ) -> AppResult<bool>;
}
