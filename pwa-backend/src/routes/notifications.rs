use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use pwa_shared::errors::{AppError, AppResult, ErrorCode};
use pwa_shared::types::ApiResponse;

use crate::routes::{json_body, parse_user_id};
use crate::services::notification_service::{PayloadFields, SendStyle};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub user_id: Option<String>,
    pub subscription: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub fields: PayloadFields,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    pub public_key: String,
}

/// POST /api/notifications/subscribe
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse>> {
    let req = json_body(payload)?;

    const MISSING: &str = "userId y subscription son obligatorios";
    let subscription = match req.subscription {
        Some(serde_json::Value::Null) | None => {
            return Err(AppError::new(ErrorCode::ValidationError, MISSING));
        }
        Some(value) => value,
    };
    let user_id = parse_user_id(req.user_id.as_deref(), MISSING, "userId debe ser un UUID válido")?;

    state.notifications.subscribe(user_id, subscription).await?;

    Ok(Json(ApiResponse::ack("Suscripción guardada exitosamente")))
}

/// POST /api/notifications/send
pub async fn send(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse>> {
    let req = json_body(payload)?;
    let user_id = parse_user_id(
        req.user_id.as_deref(),
        "userId es obligatorio",
        "userId debe ser un UUID válido",
    )?;

    state
        .notifications
        .send(user_id, req.fields, SendStyle::Generic)
        .await?;

    Ok(Json(ApiResponse::ack("Notificación enviada exitosamente")))
}

/// POST /api/notifications/send-to-user
/// Same contract as `send`, with defaults personalized for the recipient.
pub async fn send_to_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse>> {
    let req = json_body(payload)?;
    let user_id = parse_user_id(
        req.user_id.as_deref(),
        "El campo userId es obligatorio",
        "El userId no es un UUID válido",
    )?;

    let delivery = state
        .notifications
        .send(user_id, req.fields, SendStyle::Personalized)
        .await?;

    Ok(Json(ApiResponse::ack(format!(
        "Notificación enviada al usuario {}",
        delivery.recipient
    ))))
}

/// GET /api/notifications/public-key
pub async fn public_key(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<PublicKeyResponse>> {
    Json(ApiResponse::ok(
        "Clave pública obtenida exitosamente",
        PublicKeyResponse { public_key: state.config.vapid_public_key.clone() },
    ))
}
