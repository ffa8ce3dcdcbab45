use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use pwa_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{User, UserDraft};
use crate::store::UserStore;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 50, message = "El nombre debe tener entre 2 y 50 caracteres"))]
    pub name: Option<String>,
    #[validate(
        email(message = "Por favor ingresa un email válido"),
        length(max = 255, message = "El email no puede superar 255 caracteres")
    )]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    pub password: Option<String>,
    #[validate(
        custom = "validate_phone",
        length(max = 30, message = "El teléfono no puede superar 30 caracteres")
    )]
    pub phone: Option<String>,
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')');

    if digits.is_empty() || !digits.chars().all(allowed) {
        let mut err = ValidationError::new("phone");
        err.message = Some("Por favor ingresa un teléfono válido".into());
        return Err(err);
    }
    Ok(())
}

impl RegisterRequest {
    /// Trim text fields, lower-case the email and drop a blank phone.
    fn normalized(self) -> Self {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            name: trim(self.name),
            email: trim(self.email).map(|e| e.to_lowercase()),
            password: self.password.filter(|p| !p.is_empty()),
            phone: trim(self.phone),
        }
    }
}

fn error_messages(errors: &ValidationErrors) -> Vec<String> {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string())
        })
        .collect()
}

/// Validate a registration and create the user. The password is hashed by the store.
pub async fn register(store: &dyn UserStore, req: RegisterRequest) -> AppResult<User> {
    let req = req.normalized();

    let (Some(name), Some(email), Some(password)) = (&req.name, &req.email, &req.password) else {
        return Err(AppError::new(
            ErrorCode::ValidationError,
            "Nombre, email y contraseña son obligatorios",
        ));
    };

    if let Err(errors) = req.validate() {
        let mut messages = error_messages(&errors);
        messages.sort();
        return Err(AppError::with_details(
            ErrorCode::ValidationError,
            "Datos de entrada inválidos",
            serde_json::json!(messages),
        ));
    }

    if store.find_by_email(email).await?.is_some() {
        return Err(AppError::new(
            ErrorCode::EmailAlreadyExists,
            "Ya existe un usuario con este email",
        ));
    }

    let user = store
        .create(UserDraft {
            name: name.clone(),
            email: email.clone(),
            password: password.clone(),
            phone: req.phone.clone(),
        })
        .await?;

    tracing::info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}
