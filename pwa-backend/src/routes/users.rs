use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use pwa_shared::errors::{AppError, AppResult, ErrorCode};
use pwa_shared::types::ApiResponse;

use crate::models::{User, UserSummary};
use crate::routes::{json_body, parse_user_id};
use crate::services::user_service::{self, RegisterRequest};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct UserDetail {
    pub user: User,
}

/// POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<RegisteredUser>>)> {
    let req = json_body(payload)?;
    let user = user_service::register(state.users.as_ref(), req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Usuario registrado exitosamente",
            RegisteredUser { user: UserSummary::from(&user) },
        )),
    ))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let users = state.users.list().await?;
    Ok(Json(ApiResponse::ok("Usuarios obtenidos exitosamente", UserList { users })))
}

/// GET /api/user/:id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<UserDetail>>> {
    let id = parse_user_id(Some(&id), "id es obligatorio", "id debe ser un UUID válido")?;

    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound, "Usuario no encontrado"))?;

    Ok(Json(ApiResponse::ok("Usuario obtenido exitosamente", UserDetail { user })))
}
