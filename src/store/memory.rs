use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::User;
use crate::store::{AuthStore, StoreError, UserChanges};

/// In-memory store used by the integration-test harness. A single mutex
/// guards both maps, so redeem_reset_token's match-and-clear is one
/// critical section, matching the Postgres conditional UPDATE.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    blacklist: HashMap<String, DateTime<Utc>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthStore for MemoryStore {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict("Email already exists".to_string()));
        }
        let user = User {
            id: Uuid::now_v7(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            name: name.to_string(),
            reset_token: None,
            reset_token_expires: None,
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.get(&id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn update_user(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.users.remove(&id).is_some())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(user) = inner.users.get_mut(&id) {
            user.reset_token = Some(token.to_string());
            user.reset_token_expires = Some(expires_at);
        }
        Ok(())
    }

    async fn redeem_reset_token(
        &self,
        token: &str,
        new_password_hash: &str,
    ) -> Result<Option<User>, StoreError> {
        let now = Utc::now();
        let mut inner = self.inner.lock().unwrap();
        let user = inner.users.values_mut().find(|u| {
            u.reset_token.as_deref() == Some(token)
                && u.reset_token_expires.is_some_and(|exp| exp > now)
        });
        let Some(user) = user else {
            return Ok(None);
        };
        user.password_hash = new_password_hash.to_string();
        user.reset_token = None;
        user.reset_token_expires = None;
        Ok(Some(user.clone()))
    }

    async fn revoke_token(
        &self,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.blacklist.entry(token.to_string()).or_insert(expires_at);
        Ok(())
    }

    async fn is_token_revoked(&self, token: &str) -> Result<bool, StoreError> {
        let now = Utc::now();
        let inner = self.inner.lock().unwrap();
        Ok(inner.blacklist.get(token).is_some_and(|exp| *exp > now))
    }

    async fn purge_expired_tokens(&self) -> Result<u64, StoreError> {
        let now = Utc::now();
        let mut inner = self.inner.lock().unwrap();
        let before = inner.blacklist.len();
        inner.blacklist.retain(|_, exp| *exp > now);
        Ok((before - inner.blacklist.len()) as u64)
    }
}
