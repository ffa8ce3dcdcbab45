pub mod health;
pub mod notifications;
pub mod root;
pub mod users;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use uuid::Uuid;

use pwa_shared::errors::{AppError, AppResult, ErrorCode};

/// Unwrap a JSON body, turning axum's plain-text rejection into the API error envelope.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "rejected request body");
        AppError::bad_request("El cuerpo de la petición no es JSON válido")
    })
}

/// Parse a user id, distinguishing a missing value from a malformed one.
pub(crate) fn parse_user_id(raw: Option<&str>, missing: &str, invalid: &str) -> AppResult<Uuid> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = raw else {
        return Err(AppError::new(ErrorCode::ValidationError, missing));
    };
    Uuid::parse_str(raw).map_err(|_| AppError::new(ErrorCode::ValidationError, invalid))
}
