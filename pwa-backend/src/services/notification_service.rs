use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pwa_shared::errors::{AppError, AppResult, ErrorCode};

use crate::config::AppConfig;
use crate::models::User;
use crate::push::{PushFailure, PushTransport};
use crate::services::subscription_repository::SubscriptionRepository;
use crate::store::UserStore;

/// Fallback values for every payload field the caller leaves out.
#[derive(Debug, Clone)]
pub struct PayloadDefaults {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub url: String,
    pub badge: String,
}

impl Default for PayloadDefaults {
    fn default() -> Self {
        Self {
            title: "¡Hola!".into(),
            body: "Esta es una notificación de prueba".into(),
            icon: "/neko.png".into(),
            url: "/".into(),
            badge: "/neko-512.png".into(),
        }
    }
}

impl PayloadDefaults {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            title: config.default_title.clone(),
            body: config.default_body.clone(),
            icon: config.default_icon.clone(),
            url: config.default_url.clone(),
            badge: config.default_badge.clone(),
        }
    }
}

/// Caller-supplied payload fields. Missing or empty fields fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayloadFields {
    pub title: Option<String>,
    pub body: Option<String>,
    pub icon: Option<String>,
    pub url: Option<String>,
}

/// Which default title/body a send uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStyle {
    Generic,
    /// Greets the recipient by name.
    Personalized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub url: String,
    pub badge: String,
}

impl NotificationPayload {
    pub fn build(fields: PayloadFields, defaults: &PayloadDefaults, style: SendStyle, recipient: &User) -> Self {
        let (title, body) = match style {
            SendStyle::Generic => (defaults.title.clone(), defaults.body.clone()),
            SendStyle::Personalized => {
                let name = if recipient.name.is_empty() { "usuario" } else { recipient.name.as_str() };
                (format!("Hola {name} 👋"), "Tienes una nueva notificación.".to_string())
            }
        };

        Self {
            title: or_default(fields.title, title),
            body: or_default(fields.body, body),
            icon: or_default(fields.icon, defaults.icon.clone()),
            url: or_default(fields.url, defaults.url.clone()),
            badge: defaults.badge.clone(),
        }
    }
}

fn or_default(value: Option<String>, default: String) -> String {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(default)
}

/// Outcome of a successful send.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// The recipient's name, or email when the name is empty.
    pub recipient: String,
}

/// Orchestrates subscribe, send and stale-subscription cleanup.
pub struct NotificationService {
    users: Arc<dyn UserStore>,
    subscriptions: SubscriptionRepository,
    transport: Arc<dyn PushTransport>,
    defaults: PayloadDefaults,
    timeout: Duration,
}

impl NotificationService {
    pub fn new(
        users: Arc<dyn UserStore>,
        transport: Arc<dyn PushTransport>,
        defaults: PayloadDefaults,
        timeout: Duration,
    ) -> Self {
        Self {
            subscriptions: SubscriptionRepository::new(users.clone()),
            users,
            transport,
            defaults,
            timeout,
        }
    }

    /// Store `subscription` as the user's only push subscription, replacing any previous one.
    pub async fn subscribe(&self, user_id: Uuid, subscription: serde_json::Value) -> AppResult<()> {
        if !is_descriptor(&subscription) {
            return Err(AppError::new(
                ErrorCode::ValidationError,
                "subscription debe ser un objeto no vacío",
            ));
        }

        self.subscriptions.set(user_id, Some(subscription)).await?;
        tracing::info!(user_id = %user_id, "push subscription saved");
        Ok(())
    }

    pub async fn send(&self, user_id: Uuid, fields: PayloadFields, style: SendStyle) -> AppResult<Delivery> {
        let not_found = match style {
            SendStyle::Generic => "Usuario no encontrado o sin suscripción",
            SendStyle::Personalized => "Usuario no encontrado o sin suscripción activa",
        };

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::UserNotFound, not_found))?;
        let subscription = user
            .push_subscription
            .clone()
            .ok_or_else(|| AppError::new(ErrorCode::SubscriptionNotFound, not_found))?;

        let payload = NotificationPayload::build(fields, &self.defaults, style, &user);
        let body = serde_json::to_vec(&payload).map_err(|e| AppError::Internal(e.into()))?;

        let result = match tokio::time::timeout(self.timeout, self.transport.send(&subscription, &body)).await {
            Ok(result) => result,
            Err(_) => Err(PushFailure::Rejected(format!("timed out after {:?}", self.timeout))),
        };

        if let Err(failure) = result {
            tracing::error!(user_id = %user_id, error = %failure, "push notification failed");
            counter!("push_notifications_failed_total", "reason" => failure.reason()).increment(1);

            if failure.is_permanent() {
                self.discard_subscription(user_id).await;
            }

            let message = match style {
                SendStyle::Generic => "Error enviando notificación",
                SendStyle::Personalized => "Error enviando la notificación al usuario",
            };
            return Err(AppError::new(ErrorCode::DeliveryFailed, message));
        }

        counter!("push_notifications_sent_total").increment(1);
        tracing::info!(user_id = %user_id, title = %payload.title, "push notification sent");

        let recipient = if user.name.is_empty() { user.email } else { user.name };
        Ok(Delivery { recipient })
    }

    /// Best effort: the send has already failed, so errors here are only logged.
    async fn discard_subscription(&self, user_id: Uuid) {
        match self.subscriptions.get(user_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::debug!(user_id = %user_id, "push subscription already cleared");
                return;
            }
            Err(e) if e.error_code() == ErrorCode::UserNotFound => {
                tracing::debug!(user_id = %user_id, "user gone before subscription cleanup");
                return;
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "failed to reload user for subscription cleanup");
                return;
            }
        }

        match self.subscriptions.set(user_id, None).await {
            Ok(()) => {
                counter!("push_subscriptions_cleared_total").increment(1);
                tracing::info!(user_id = %user_id, "invalid push subscription removed");
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "failed to clear invalid push subscription");
            }
        }
    }
}

fn is_descriptor(value: &serde_json::Value) -> bool {
    value.as_object().is_some_and(|obj| !obj.is_empty())
}
