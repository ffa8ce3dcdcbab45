use axum::Json;
use serde::Serialize;

use pwa_shared::errors::{AppError, ErrorCode};
use pwa_shared::types::ApiResponse;

#[derive(Debug, Serialize)]
pub struct Timestamp {
    pub timestamp: String,
}

/// GET /
pub async fn index() -> Json<ApiResponse<Timestamp>> {
    Json(ApiResponse::ok(
        "API de PWA Backend funcionando correctamente",
        Timestamp { timestamp: chrono::Utc::now().to_rfc3339() },
    ))
}

pub async fn not_found() -> AppError {
    AppError::new(ErrorCode::NotFound, "Ruta no encontrada")
}

pub async fn method_not_allowed() -> AppError {
    AppError::new(ErrorCode::MethodNotAllowed, "Método no permitido")
}
