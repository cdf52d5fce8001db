use crate::auth::{current_email, SESSION_EMAIL_KEY};
use crate::error::{AppError, Result};
use crate::services::auth_service::LoginRequest;
use crate::services::user_service::{RegisterRequest, UserServiceError};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

#[derive(Deserialize)]
pub struct RegisterBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<Response> {
    let user = state
        .user_service
        .register(RegisterRequest {
            name: body.name,
            email: body.email,
            password: body.password,
        })
        .await
        .map_err(|err| match err {
            UserServiceError::MissingName => AppError::Validation("Name is required".into()),
            UserServiceError::InvalidEmail => {
                AppError::Validation("A valid email is required".into())
            }
            UserServiceError::WeakPassword => {
                AppError::Validation("Password must be at least 6 characters".into())
            }
            UserServiceError::EmailTaken => {
                AppError::Validation("Email already registered".into())
            }
            other => AppError::Upstream(other.to_string()),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "user": user })),
    )
        .into_response())
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> Result<Json<serde_json::Value>> {
    let user = state
        .auth_service
        .authenticate(LoginRequest {
            email: body.email,
            password: body.password,
        })
        .await
        .map_err(|_| AppError::Unauthorized)?;

    session
        .insert(SESSION_EMAIL_KEY, user.email.clone())
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;
    session
        .insert("auth_timestamp", chrono::Utc::now().timestamp())
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    Ok(Json(json!({ "success": true, "user": user })))
}

pub async fn logout_handler(session: Session) -> Result<Json<serde_json::Value>> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;
    Ok(Json(json!({ "success": true })))
}

/// Current-user snapshot. Premium and admin flags are re-read from the
/// store so a token refresh never carries a stale entitlement.
pub async fn me_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<serde_json::Value>> {
    let email = current_email(&session).await?;
    let user = state
        .auth_service
        .get_user(&email)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;
    Ok(Json(json!({ "user": user })))
}
