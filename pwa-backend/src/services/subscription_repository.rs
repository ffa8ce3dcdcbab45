use std::sync::Arc;

use uuid::Uuid;

use pwa_shared::errors::{AppError, AppResult, ErrorCode};

use crate::store::UserStore;

/// Reads and writes the single push-subscription field of a user.
#[derive(Clone)]
pub struct SubscriptionRepository {
    store: Arc<dyn UserStore>,
}

impl SubscriptionRepository {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, user_id: Uuid) -> AppResult<Option<serde_json::Value>> {
        let user = self.store.find_by_id(user_id).await?.ok_or_else(user_not_found)?;
        Ok(user.push_subscription)
    }

    pub async fn set(&self, user_id: Uuid, subscription: Option<serde_json::Value>) -> AppResult<()> {
        if self.store.set_push_subscription(user_id, subscription).await? {
            Ok(())
        } else {
            Err(user_not_found())
        }
    }
}

fn user_not_found() -> AppError {
    AppError::new(ErrorCode::UserNotFound, "Usuario no encontrado")
}
