pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::User;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug)]
pub enum StoreError {
    /// Unique-constraint violation on create.
    Conflict(String),
    /// The backing store failed or is unreachable.
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Conflict(msg) => write!(f, "conflict: {msg}"),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Partial update applied to a user record. `None` fields are left as-is.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

/// Persistence seam for user records and the token blacklist.
///
/// The service only ever talks to this trait; production wires in
/// [`PgStore`], the test harness wires in [`MemoryStore`].
#[async_trait]
pub trait AuthStore: Send + Sync {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Returns the updated user, or `None` if no such user exists.
    async fn update_user(&self, id: Uuid, changes: UserChanges)
        -> Result<Option<User>, StoreError>;

    /// Returns whether a row was actually deleted.
    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn set_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Atomically matches an unexpired reset token, installs the new
    /// password hash, and clears both reset fields. Returns the updated
    /// user, or `None` if no user holds the token unexpired. The match
    /// and clear are a single store operation, so concurrent redemptions
    /// of the same token admit exactly one winner.
    async fn redeem_reset_token(
        &self,
        token: &str,
        new_password_hash: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Inserts a blacklist row. Re-revoking the same token is a no-op.
    async fn revoke_token(&self, token: &str, expires_at: DateTime<Utc>)
        -> Result<(), StoreError>;

    /// Exact-match existence check, ignoring rows past their expiry.
    async fn is_token_revoked(&self, token: &str) -> Result<bool, StoreError>;

    /// Deletes blacklist rows past their expiry. Returns the row count.
    async fn purge_expired_tokens(&self) -> Result<u64, StoreError>;
}
