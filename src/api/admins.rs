use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Deserialize;
use std::sync::Arc;

use super::{AdminDto, ApiError, AppState};
use crate::db::AdminUser;
use crate::entities::admin_users::AdminRole;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<AdminRole>,
}

/// POST /admins
/// Create a new admin account. Only system admins may do this.
pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AdminUser>,
    Json(payload): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<AdminDto>), ApiError> {
    if caller.role != AdminRole::System {
        return Err(ApiError::Forbidden(
            "Only system admins can create accounts".to_string(),
        ));
    }

    let name = payload.name.trim();
    let email = payload.email.trim();

    if name.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::validation("A valid email is required"));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }

    if state
        .store()
        .get_admin_by_email(email)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to query admin: {e}")))?
        .is_some()
    {
        return Err(ApiError::conflict(format!(
            "An admin with email '{email}' already exists"
        )));
    }

    let role = payload.role.unwrap_or(AdminRole::Admin);
    let admin = state
        .store()
        .create_admin(name, email, &payload.password, role)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create admin: {e}")))?;

    tracing::info!("Admin account created: {} by {}", admin.email, caller.email);

    Ok((StatusCode::CREATED, Json(AdminDto::from(admin))))
}
