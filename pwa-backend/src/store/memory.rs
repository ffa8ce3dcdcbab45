use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use pwa_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{User, UserDraft, UserRole};
use crate::services::password;

use super::UserStore;

/// In-process store for tests. `fail_writes` makes every subscription write error.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
    pub fail_writes: std::sync::atomic::AtomicBool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a ready-made user and return its id.
    pub fn seed(&self, name: &str, email: &str, subscription: Option<serde_json::Value>) -> Uuid {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            phone: None,
            role: UserRole::User.to_string(),
            is_active: true,
            push_subscription: subscription,
            created_at: now,
            updated_at: now,
        };
        let id = user.id;
        self.users.lock().unwrap().insert(id, user);
        id
    }

    pub fn subscription_of(&self, id: Uuid) -> Option<serde_json::Value> {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .and_then(|u| u.push_subscription.clone())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut items: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn create(&self, draft: UserDraft) -> AppResult<User> {
        let password_hash = password::hash_password(&draft.password)?;
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == draft.email) {
            return Err(AppError::new(
                ErrorCode::EmailAlreadyExists,
                "Ya existe un usuario con este email",
            ));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: draft.name,
            email: draft.email,
            password_hash,
            phone: draft.phone,
            role: UserRole::User.to_string(),
            is_active: true,
            push_subscription: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_push_subscription(
        &self,
        id: Uuid,
        subscription: Option<serde_json::Value>,
    ) -> AppResult<bool> {
        if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(AppError::Internal(anyhow::anyhow!("store unavailable")));
        }
        match self.users.lock().unwrap().get_mut(&id) {
            Some(user) => {
                user.push_subscription = subscription;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
