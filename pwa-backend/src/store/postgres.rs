use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use pwa_shared::clients::db::{get_conn, DbConn, DbPool};
use pwa_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{NewUser, User, UserDraft, UserRole};
use crate::schema::users;
use crate::services::password;

use super::UserStore;

/// Postgres-backed store. Diesel is synchronous, so every query runs on the
/// blocking thread pool.
#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run<T, F>(&self, f: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut DbConn) -> AppResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = get_conn(&pool)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("blocking task failed: {e}")))?
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.run(move |conn| {
            let user = users::table
                .find(id)
                .first::<User>(conn)
                .optional()?;
            Ok(user)
        })
        .await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_string();
        self.run(move |conn| {
            let user = users::table
                .filter(users::email.eq(&email))
                .first::<User>(conn)
                .optional()?;
            Ok(user)
        })
        .await
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        self.run(|conn| {
            let items = users::table
                .order(users::created_at.desc())
                .load::<User>(conn)?;
            Ok(items)
        })
        .await
    }

    async fn create(&self, draft: UserDraft) -> AppResult<User> {
        let password_hash = password::hash_password(&draft.password)?;
        let new_user = NewUser {
            name: draft.name,
            email: draft.email,
            password_hash,
            phone: draft.phone,
            role: UserRole::User.to_string(),
        };

        self.run(move |conn| {
            diesel::insert_into(users::table)
                .values(&new_user)
                .get_result::<User>(conn)
                .map_err(|e| match e {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        AppError::new(ErrorCode::EmailAlreadyExists, "Ya existe un usuario con este email")
                    }
                    other => AppError::Database(other),
                })
        })
        .await
    }

    async fn set_push_subscription(
        &self,
        id: Uuid,
        subscription: Option<serde_json::Value>,
    ) -> AppResult<bool> {
        self.run(move |conn| {
            let updated = diesel::update(users::table.find(id))
                .set((
                    users::push_subscription.eq(subscription),
                    users::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;
            Ok(updated > 0)
        })
        .await
    }
}
