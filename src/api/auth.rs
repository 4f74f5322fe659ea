use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{AdminDto, ApiError, AppState, MessageResponse};
use crate::db::AdminUser;

/// Name of the session cookie issued on login.
pub const SESSION_COOKIE: &str = "admin_session";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware that checks:
/// 1. `admin_session` cookie (from login)
/// 2. `Authorization: Bearer <token>` header
///
/// On success the resolved [`AdminUser`] is attached to the request
/// extensions for handlers to read.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = extract_session_token(request.headers()) else {
        return Err(ApiError::unauthorized());
    };

    let admin = state
        .store()
        .resolve_session(&token)
        .await
        .map_err(|e| ApiError::internal(format!("Session lookup failed: {e}")))?;

    let Some(admin) = admin else {
        return Err(ApiError::unauthorized());
    };

    tracing::debug!(admin_id = admin.id, "Authenticated request");
    request.extensions_mut().insert(admin);
    Ok(next.run(request).await)
}

/// Extract the session token from the cookie header or a Bearer header.
fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(cookies) = headers.get(header::COOKIE)
        && let Ok(cookie_str) = cookies.to_str()
    {
        for pair in cookie_str.split(';') {
            if let Some(value) = pair.trim().strip_prefix(&format!("{SESSION_COOKIE}=")) {
                return Some(value.to_string());
            }
        }
    }

    if let Some(auth_header) = headers.get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Verify an email/password pair and set the session cookie on success.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    if payload.email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let admin = state
        .store()
        .verify_admin_login(&payload.email, &payload.password)
        .await
        .map_err(|e| ApiError::internal(format!("Authentication error: {e}")))?;

    let Some(admin) = admin else {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    };

    let issued = state
        .store()
        .issue_session(admin.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!("Admin logged in: {}", admin.email);

    let cookie = session_cookie(
        &issued.token,
        issued.expires_at,
        state.config().server.secure_cookies,
    );

    let mut response = Json(AdminDto::from(admin)).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        cookie
            .parse()
            .map_err(|e| ApiError::internal(format!("Invalid cookie value: {e}")))?,
    );

    Ok(response)
}

/// POST /auth/logout
/// Revoke the presented session and clear the cookie. Safe to call without
/// a valid session.
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = extract_session_token(&headers)
        && let Err(e) = state.store().revoke_session(&token).await
    {
        tracing::warn!("Failed to revoke session: {e}");
    }

    let cookie = clear_cookie(state.config().server.secure_cookies);

    let mut response = (
        StatusCode::OK,
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
        .into_response();

    if let Ok(value) = cookie.parse() {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }

    response
}

/// GET /auth/me
/// Return the authenticated admin attached by the middleware.
pub async fn get_current_admin(
    axum::Extension(admin): axum::Extension<AdminUser>,
) -> Json<AdminDto> {
    Json(AdminDto::from(admin))
}

// ============================================================================
// Helpers
// ============================================================================

fn session_cookie(token: &str, expires_at: chrono::DateTime<chrono::Utc>, secure: bool) -> String {
    let expires = expires_at.format("%a, %d %b %Y %H:%M:%S GMT");
    let mut cookie =
        format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Expires={expires}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn clear_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Expires=Thu, 01 Jan 1970 00:00:00 GMT"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_carries_session_attributes() {
        let expires_at = chrono::Utc::now() + chrono::Duration::days(7);
        let cookie = session_cookie("abc123", expires_at, false);

        assert!(cookie.starts_with("admin_session=abc123; "));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(!cookie.contains("Secure"));

        let secure = session_cookie("abc123", expires_at, true);
        assert!(secure.ends_with("; Secure"));
    }

    #[test]
    fn token_extraction_prefers_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "other=1; admin_session=tok-from-cookie".parse().unwrap(),
        );
        headers.insert(
            header::AUTHORIZATION,
            "Bearer tok-from-header".parse().unwrap(),
        );

        assert_eq!(
            extract_session_token(&headers),
            Some("tok-from-cookie".to_string())
        );
    }

    #[test]
    fn token_extraction_falls_back_to_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Bearer tok-from-header".parse().unwrap(),
        );

        assert_eq!(
            extract_session_token(&headers),
            Some("tok-from-header".to_string())
        );

        assert_eq!(extract_session_token(&HeaderMap::new()), None);
    }
}
